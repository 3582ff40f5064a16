// SPDX-FileCopyrightText: 2026 Answerkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Widget API HTTP server built on axum.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;

use answerkit_config::{RetrievalConfig, ServerConfig};
use answerkit_core::AnswerkitError;
use answerkit_pipeline::QueryPipeline;

use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// The widget query pipeline.
    pub pipeline: Arc<QueryPipeline>,
    /// Defaults applied when the caller omits retrieval parameters.
    pub retrieval: RetrievalConfig,
}

/// Build the router. Separated from [`start_server`] so tests can drive it
/// without a socket.
pub fn router(state: GatewayState) -> Router {
    // The widget is embedded on arbitrary customer pages, so CORS stays
    // permissive; the per-token origin allow-list enforced during token
    // validation is the real gate. Preflight OPTIONS requests are answered
    // here and never reach the pipeline.
    Router::new()
        .route("/health", get(handlers::get_health))
        .route("/v1/bots/{bot_id}/query", post(handlers::post_query))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the widget API server. Runs until SIGINT or SIGTERM.
pub async fn start_server(config: &ServerConfig, state: GatewayState) -> Result<(), AnswerkitError> {
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AnswerkitError::Internal(format!("failed to bind to {addr}: {e}")))?;

    tracing::info!("widget API listening on {addr}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| AnswerkitError::Internal(format!("server error: {e}")))?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(sigterm) => sigterm,
            Err(e) => {
                tracing::warn!("failed to install SIGTERM handler: {e}");
                let _ = ctrl_c.await;
                tracing::info!("received SIGINT (Ctrl+C), shutting down");
                return;
            }
        };

        tokio::select! {
            _ = ctrl_c => {
                tracing::info!("received SIGINT (Ctrl+C), shutting down");
            }
            _ = sigterm.recv() => {
                tracing::info!("received SIGTERM, shutting down");
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = ctrl_c.await;
        tracing::info!("received Ctrl+C, shutting down");
    }
}
