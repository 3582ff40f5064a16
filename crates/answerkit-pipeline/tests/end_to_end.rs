// SPDX-FileCopyrightText: 2026 Answerkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Full pipeline runs against an in-memory SQLite store with scripted
//! providers.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use answerkit_core::AnswerkitError;
use answerkit_core::traits::{
    AuditSink, CompletionProvider, EmbeddingProvider, TokenStore, UsageCounts,
};
use answerkit_core::types::{BotId, Completion, QueryRecord, TokenUsage, WidgetQueryRequest};
use answerkit_pipeline::{
    QueryPipeline, QuotaGuard, RateLimiter, RetrievalEngine, TokenAuthorizer, TokenManager,
};
use answerkit_storage::SqliteStore;

struct FixedEmbedder {
    vector: Vec<f32>,
}

#[async_trait]
impl EmbeddingProvider for FixedEmbedder {
    fn name(&self) -> &'static str {
        "fixed"
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, AnswerkitError> {
        Ok(texts.iter().map(|_| self.vector.clone()).collect())
    }
}

struct ScriptedCompleter {
    prompts: Mutex<Vec<String>>,
}

#[async_trait]
impl CompletionProvider for ScriptedCompleter {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn complete(&self, prompt: &str) -> Result<Completion, AnswerkitError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(Completion {
            text: "The refund window is 30 days.".to_string(),
            usage: TokenUsage {
                prompt_tokens: Some(100),
                completion_tokens: Some(10),
                total_tokens: Some(110),
            },
            provider: "scripted",
        })
    }
}

struct FailingAudit;

#[async_trait]
impl AuditSink for FailingAudit {
    async fn append(&self, _record: &QueryRecord) -> Result<String, AnswerkitError> {
        Err(AnswerkitError::upstream("audit", "sink unavailable"))
    }
}

struct Harness {
    store: SqliteStore,
    completer: Arc<ScriptedCompleter>,
    pipeline: QueryPipeline,
    secret: String,
    bot: BotId,
}

async fn harness_with(per_minute: u32, audit: Option<Arc<dyn AuditSink>>) -> Harness {
    let store = SqliteStore::in_memory().await.unwrap();
    let bot = BotId("bot-1".into());
    answerkit_storage::queries::plans::insert_bot(
        store.database(),
        &bot,
        "user-1",
        Some("Support"),
        None,
    )
    .await
    .unwrap();

    // Two passages: cosine 0.81 against the unit-x query vector, and 0.10
    // which sits below the 0.25 threshold.
    let high = [0.81f32, (1.0 - 0.81f32 * 0.81).sqrt()];
    let low = [0.10f32, (1.0 - 0.10f32 * 0.10).sqrt()];
    store
        .insert_chunk(&bot, Some("Refunds"), "Refunds are available within 30 days.", &high)
        .await
        .unwrap();
    store
        .insert_chunk(&bot, Some("Shipping"), "Shipping takes 3-5 business days.", &low)
        .await
        .unwrap();

    let store_arc = Arc::new(store.clone());
    let quota = Arc::new(QuotaGuard::new(
        store_arc.clone(),
        store_arc.clone(),
        "free".into(),
        "support@answerkit.dev".into(),
    ));
    let manager = TokenManager::new(store_arc.clone() as Arc<dyn TokenStore>, quota.clone());
    let issued = manager
        .issue(&bot, None, vec!["https://a.com".into()], None)
        .await
        .unwrap();

    let embedder = Arc::new(FixedEmbedder {
        vector: vec![1.0, 0.0],
    });
    let completer = Arc::new(ScriptedCompleter {
        prompts: Mutex::new(Vec::new()),
    });
    let pipeline = QueryPipeline::new(
        Arc::new(RateLimiter::new(per_minute)),
        TokenAuthorizer::new(store_arc.clone(), false),
        quota,
        RetrievalEngine::new(embedder, store_arc.clone()),
        completer.clone(),
        audit.unwrap_or(store_arc),
    );

    Harness {
        store,
        completer,
        pipeline,
        secret: issued.secret,
        bot,
    }
}

fn request(h: &Harness, fingerprint: &str) -> WidgetQueryRequest {
    WidgetQueryRequest {
        bot_id: h.bot.clone(),
        query_text: "What is the refund window?".into(),
        top_k: 5,
        min_score: 0.25,
        raw_token: Some(h.secret.clone()),
        origin: Some("https://a.com".into()),
        fingerprint: fingerprint.into(),
        session_id: None,
        page_url: Some("https://a.com/help".into()),
    }
}

#[tokio::test]
async fn answers_with_only_the_passing_citation() {
    let h = harness_with(60, None).await;
    let answer = h.pipeline.handle(request(&h, "client-1")).await.unwrap();

    assert_eq!(answer.answer, "The refund window is 30 days.");
    assert_eq!(answer.citations.len(), 1);
    assert_eq!(answer.citations[0].heading.as_deref(), Some("Refunds"));
    assert!((answer.citations[0].score - 0.81).abs() < 1e-3);
    assert!(answer.context_preview.contains("30 days"));

    // The prompt was grounded in the passing passage only.
    let prompts = h.completer.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Refunds are available within 30 days."));
    assert!(!prompts[0].contains("Shipping takes"));
    assert!(prompts[0].contains("What is the refund window?"));
    assert!(prompts[0].contains("cite sources by heading"));
}

#[tokio::test]
async fn audit_row_is_written_on_success() {
    let h = harness_with(60, None).await;
    h.pipeline.handle(request(&h, "client-1")).await.unwrap();

    assert_eq!(h.store.queries_today(&h.bot).await.unwrap(), 1);
}

#[tokio::test]
async fn audit_failure_does_not_change_the_response() {
    let h = harness_with(60, Some(Arc::new(FailingAudit))).await;
    let answer = h.pipeline.handle(request(&h, "client-1")).await.unwrap();
    assert_eq!(answer.answer, "The refund window is 30 days.");
}

#[tokio::test]
async fn over_limit_requests_are_rejected() {
    let h = harness_with(2, None).await;
    h.pipeline.handle(request(&h, "client-1")).await.unwrap();
    h.pipeline.handle(request(&h, "client-1")).await.unwrap();
    let err = h.pipeline.handle(request(&h, "client-1")).await.unwrap_err();
    assert!(matches!(err, AnswerkitError::RateLimited));

    // Another fingerprint is unaffected.
    h.pipeline.handle(request(&h, "client-2")).await.unwrap();
}

#[tokio::test]
async fn wrong_token_is_unauthorized() {
    let h = harness_with(60, None).await;
    let mut req = request(&h, "client-1");
    req.raw_token = Some("not-the-secret".into());
    let err = h.pipeline.handle(req).await.unwrap_err();
    assert!(matches!(err, AnswerkitError::Unauthorized));
}

#[tokio::test]
async fn token_bound_to_another_bot_is_unauthorized() {
    let h = harness_with(60, None).await;
    let mut req = request(&h, "client-1");
    req.bot_id = BotId("bot-2".into());
    let err = h.pipeline.handle(req).await.unwrap_err();
    assert!(matches!(err, AnswerkitError::Unauthorized));
}

#[tokio::test]
async fn foreign_origin_is_unauthorized() {
    let h = harness_with(60, None).await;
    let mut req = request(&h, "client-1");
    req.origin = Some("https://b.com".into());
    let err = h.pipeline.handle(req).await.unwrap_err();
    assert!(matches!(err, AnswerkitError::Unauthorized));
}

#[tokio::test]
async fn blank_query_fails_validation() {
    let h = harness_with(60, None).await;
    let mut req = request(&h, "client-1");
    req.query_text = "   ".into();
    let err = h.pipeline.handle(req).await.unwrap_err();
    assert!(matches!(err, AnswerkitError::Validation(_)));
}
