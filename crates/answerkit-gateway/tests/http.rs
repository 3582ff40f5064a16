// SPDX-FileCopyrightText: 2026 Answerkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Router-level tests driving the full stack over in-memory HTTP.

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use answerkit_config::RetrievalConfig;
use answerkit_core::AnswerkitError;
use answerkit_core::traits::{CompletionProvider, EmbeddingProvider};
use answerkit_core::types::{BotId, Completion, TokenUsage};
use answerkit_gateway::{GatewayState, router};
use answerkit_pipeline::{
    QueryPipeline, QuotaGuard, RateLimiter, RetrievalEngine, TokenAuthorizer, TokenManager,
};
use answerkit_storage::SqliteStore;

struct FixedEmbedder;

#[async_trait]
impl EmbeddingProvider for FixedEmbedder {
    fn name(&self) -> &'static str {
        "fixed"
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, AnswerkitError> {
        Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect())
    }
}

struct FixedCompleter;

#[async_trait]
impl CompletionProvider for FixedCompleter {
    fn name(&self) -> &'static str {
        "fixed"
    }

    async fn complete(&self, _prompt: &str) -> Result<Completion, AnswerkitError> {
        Ok(Completion {
            text: "Refunds are available within 30 days.".to_string(),
            usage: TokenUsage::default(),
            provider: "fixed",
        })
    }
}

async fn test_router(per_minute: u32) -> (Router, String) {
    let store = SqliteStore::in_memory().await.unwrap();
    let bot = BotId("bot-1".into());
    answerkit_storage::queries::plans::insert_bot(store.database(), &bot, "user-1", None, None)
        .await
        .unwrap();
    store
        .insert_chunk(&bot, Some("Refunds"), "Refunds take 30 days.", &[1.0, 0.0])
        .await
        .unwrap();

    let store = Arc::new(store);
    let quota = Arc::new(QuotaGuard::new(
        store.clone(),
        store.clone(),
        "free".into(),
        "support@answerkit.dev".into(),
    ));
    let manager = TokenManager::new(store.clone(), quota.clone());
    let issued = manager
        .issue(&bot, None, vec!["https://a.com".into()], None)
        .await
        .unwrap();

    let pipeline = QueryPipeline::new(
        Arc::new(RateLimiter::new(per_minute)),
        TokenAuthorizer::new(store.clone(), false),
        quota,
        RetrievalEngine::new(Arc::new(FixedEmbedder), store.clone()),
        Arc::new(FixedCompleter),
        store,
    );

    let state = GatewayState {
        pipeline: Arc::new(pipeline),
        retrieval: RetrievalConfig::default(),
    };
    (router(state), issued.secret)
}

fn query_request(secret: Option<&str>, uri: &str, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("origin", "https://a.com")
        .header("user-agent", "widget-test")
        .header("x-forwarded-for", "203.0.113.9");
    if let Some(secret) = secret {
        builder = builder.header("authorization", format!("Bearer {secret}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let (router, _) = test_router(60).await;
    let response = router
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn valid_query_returns_an_answer_with_citations() {
    let (router, secret) = test_router(60).await;
    let response = router
        .oneshot(query_request(
            Some(&secret),
            "/v1/bots/bot-1/query",
            r#"{"query_text": "What is the refund window?"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["answer"], "Refunds are available within 30 days.");
    assert_eq!(json["citations"][0]["heading"], "Refunds");
}

#[tokio::test]
async fn token_via_query_param_is_accepted() {
    let (router, secret) = test_router(60).await;
    let response = router
        .oneshot(query_request(
            None,
            &format!("/v1/bots/bot-1/query?token={secret}"),
            r#"{"query_text": "refunds?"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn missing_token_is_401_with_a_generic_body() {
    let (router, _) = test_router(60).await;
    let response = router
        .oneshot(query_request(
            None,
            "/v1/bots/bot-1/query",
            r#"{"query_text": "hi"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "request is unauthorized");
}

#[tokio::test]
async fn blank_query_is_422() {
    let (router, secret) = test_router(60).await;
    let response = router
        .oneshot(query_request(
            Some(&secret),
            "/v1/bots/bot-1/query",
            r#"{"query_text": "   "}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn over_limit_is_429() {
    let (router, secret) = test_router(1).await;
    let response = router
        .clone()
        .oneshot(query_request(
            Some(&secret),
            "/v1/bots/bot-1/query",
            r#"{"query_text": "first"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .oneshot(query_request(
            Some(&secret),
            "/v1/bots/bot-1/query",
            r#"{"query_text": "second"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn token_bound_to_another_bot_is_unauthorized() {
    let (router, secret) = test_router(60).await;
    // The token is bound to bot-1, so querying another bot fails closed
    // before any bot lookup.
    let response = router
        .oneshot(query_request(
            Some(&secret),
            "/v1/bots/ghost/query",
            r#"{"query_text": "hi"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
