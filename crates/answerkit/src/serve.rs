// SPDX-FileCopyrightText: 2026 Answerkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wiring for the `serve` subcommand.

use std::sync::Arc;

use tracing::info;

use answerkit_config::AnswerkitConfig;
use answerkit_core::AnswerkitError;
use answerkit_gateway::GatewayState;
use answerkit_pipeline::{
    QueryPipeline, QuotaGuard, RateLimiter, RetrievalEngine, TokenAuthorizer,
};
use answerkit_providers::build_provider_stack;
use answerkit_storage::SqliteStore;

/// Construct every collaborator and serve the widget API until shutdown.
pub async fn run(config: AnswerkitConfig) -> Result<(), AnswerkitError> {
    let store = Arc::new(SqliteStore::open(&config.storage).await?);
    let providers = build_provider_stack(&config.providers)?;

    let quota = Arc::new(QuotaGuard::new(
        store.clone(),
        store.clone(),
        config.plans.default_plan_key.clone(),
        config.plans.contact_email.clone(),
    ));
    let pipeline = QueryPipeline::new(
        Arc::new(RateLimiter::new(config.rate_limit.per_minute)),
        TokenAuthorizer::new(store.clone(), config.runtime.is_relaxed()),
        quota,
        RetrievalEngine::new(providers.embedder, store.clone()),
        providers.completer,
        store.clone(),
    );

    info!(
        environment = %config.runtime.environment,
        "starting widget API"
    );
    let state = GatewayState {
        pipeline: Arc::new(pipeline),
        retrieval: config.retrieval.clone(),
    };
    let result = answerkit_gateway::start_server(&config.server, state).await;

    store.close().await?;
    result
}
