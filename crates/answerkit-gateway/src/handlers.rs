// SPDX-FileCopyrightText: 2026 Answerkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP handlers for the public widget API.

use std::net::SocketAddr;

use axum::Json;
use axum::extract::rejection::ExtensionRejection;
use axum::extract::{ConnectInfo, Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::error;

use answerkit_core::AnswerkitError;
use answerkit_core::types::{BotId, SessionId, WidgetQueryRequest};

use crate::extract::{extract_origin, extract_token, fingerprint};
use crate::server::GatewayState;

/// Request body for POST /v1/bots/{bot_id}/query.
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    /// The visitor's question.
    pub query_text: String,
    /// Number of passages to retrieve (default from config, bounds 1-20).
    #[serde(default)]
    pub top_k: Option<usize>,
    /// Minimum similarity score (default from config, bounds 0.0-1.0).
    #[serde(default)]
    pub min_score: Option<f32>,
    /// Opaque visitor session identifier.
    #[serde(default)]
    pub session_id: Option<String>,
    /// Page the widget is embedded on.
    #[serde(default)]
    pub page_url: Option<String>,
}

/// Recognized query-string parameters.
#[derive(Debug, Default, Deserialize)]
pub struct QueryParams {
    /// Token fallback for embedders that cannot set headers.
    #[serde(default)]
    pub token: Option<String>,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// GET /health
pub async fn get_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// POST /v1/bots/{bot_id}/query
///
/// The anonymous widget query path. Token validation, rate limiting, and
/// quota checks all happen inside the pipeline; this handler only translates
/// between HTTP and the transport-agnostic request shape.
pub async fn post_query(
    State(state): State<GatewayState>,
    Path(bot_id): Path<String>,
    Query(params): Query<QueryParams>,
    connect_info: Result<ConnectInfo<SocketAddr>, ExtensionRejection>,
    headers: HeaderMap,
    Json(body): Json<QueryRequest>,
) -> Response {
    let client_addr = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .or_else(|| connect_info.ok().map(|ConnectInfo(addr)| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string());

    let request = WidgetQueryRequest {
        bot_id: BotId(bot_id),
        query_text: body.query_text,
        top_k: body.top_k.unwrap_or(state.retrieval.default_top_k),
        min_score: body.min_score.unwrap_or(state.retrieval.default_min_score),
        raw_token: extract_token(&headers, params.token.as_deref()),
        origin: extract_origin(&headers),
        fingerprint: fingerprint(&client_addr, &headers),
        session_id: body.session_id.map(SessionId),
        page_url: body.page_url,
    };

    match state.pipeline.handle(request).await {
        Ok(answer) => (StatusCode::OK, Json(answer)).into_response(),
        Err(e) => error_response(e),
    }
}

/// Map a pipeline error onto an HTTP status and a safe body.
///
/// Ambient errors (storage, config, internal) are collapsed into a generic
/// 500 so backend details never leak to anonymous widget callers.
pub fn error_response(err: AnswerkitError) -> Response {
    let (status, message) = match &err {
        AnswerkitError::RateLimited => (StatusCode::TOO_MANY_REQUESTS, err.to_string()),
        AnswerkitError::Unauthorized => (StatusCode::UNAUTHORIZED, err.to_string()),
        AnswerkitError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()),
        AnswerkitError::QuotaExceeded { .. } | AnswerkitError::FeatureUnavailable { .. } => {
            (StatusCode::FORBIDDEN, err.to_string())
        }
        AnswerkitError::NotFound { .. } => (StatusCode::NOT_FOUND, err.to_string()),
        AnswerkitError::Upstream { .. } | AnswerkitError::Timeout { .. } => {
            error!(error = %err, "upstream failure");
            (
                StatusCode::BAD_GATEWAY,
                "upstream service unavailable".to_string(),
            )
        }
        AnswerkitError::Config(_) | AnswerkitError::Storage { .. } | AnswerkitError::Internal(_) => {
            error!(error = %err, "internal error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal error".to_string(),
            )
        }
    };
    (status, Json(ErrorResponse { error: message })).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_request_deserializes_with_defaults() {
        let json = r#"{"query_text": "What is the refund window?"}"#;
        let req: QueryRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.query_text, "What is the refund window?");
        assert!(req.top_k.is_none());
        assert!(req.min_score.is_none());
        assert!(req.session_id.is_none());
    }

    #[test]
    fn query_request_deserializes_with_all_fields() {
        let json = r#"{
            "query_text": "hi",
            "top_k": 3,
            "min_score": 0.5,
            "session_id": "sess-1",
            "page_url": "https://a.com/pricing"
        }"#;
        let req: QueryRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.top_k, Some(3));
        assert_eq!(req.session_id.as_deref(), Some("sess-1"));
    }

    #[test]
    fn status_mapping_covers_the_taxonomy() {
        let cases = [
            (AnswerkitError::RateLimited, StatusCode::TOO_MANY_REQUESTS),
            (AnswerkitError::Unauthorized, StatusCode::UNAUTHORIZED),
            (
                AnswerkitError::Validation("bad".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                AnswerkitError::QuotaExceeded {
                    message: "over".into(),
                },
                StatusCode::FORBIDDEN,
            ),
            (
                AnswerkitError::FeatureUnavailable {
                    message: "no".into(),
                },
                StatusCode::FORBIDDEN,
            ),
            (
                AnswerkitError::NotFound {
                    resource: "bot",
                    id: "x".into(),
                },
                StatusCode::NOT_FOUND,
            ),
            (
                AnswerkitError::upstream("generation", "down"),
                StatusCode::BAD_GATEWAY,
            ),
            (
                AnswerkitError::Internal("oops".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(error_response(err).status(), expected);
        }
    }

    #[test]
    fn internal_errors_do_not_leak_details() {
        let resp = error_response(AnswerkitError::Storage {
            source: "table widget_tokens is corrupt".into(),
        });
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        // Body must carry the generic message, not the storage detail.
    }

    #[test]
    fn health_response_serializes() {
        let resp = HealthResponse {
            status: "ok".into(),
            version: "0.1.0".into(),
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"status\":\"ok\""));
    }
}
