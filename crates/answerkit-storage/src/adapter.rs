// SPDX-FileCopyrightText: 2026 Answerkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite-backed implementation of the storage collaborator traits.

use std::sync::Arc;

use async_trait::async_trait;

use answerkit_config::StorageConfig;
use answerkit_core::AnswerkitError;
use answerkit_core::traits::{AuditSink, PlanStore, SimilaritySearch, TokenStore, UsageCounts};
use answerkit_core::types::{
    BotId, NewWidgetToken, PlanLimits, QueryRecord, RetrievedChunk, SubscriptionInfo, TokenId,
    WidgetToken,
};

use crate::database::Database;
use crate::queries;

/// One SQLite database behind all storage traits.
///
/// Cloning is cheap; clones share the underlying connection.
#[derive(Clone)]
pub struct SqliteStore {
    db: Arc<Database>,
}

impl SqliteStore {
    /// Open the configured database file, creating and migrating as needed.
    pub async fn open(config: &StorageConfig) -> Result<Self, AnswerkitError> {
        let db = Database::open(&config.database_path, config.wal_mode).await?;
        Ok(Self { db: Arc::new(db) })
    }

    /// In-memory store for tests and ephemeral tooling.
    pub async fn in_memory() -> Result<Self, AnswerkitError> {
        let db = Database::open_in_memory().await?;
        Ok(Self { db: Arc::new(db) })
    }

    /// The underlying database handle.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Insert a chunk with its embedding (ingestion path).
    pub async fn insert_chunk(
        &self,
        bot_id: &BotId,
        heading: Option<&str>,
        excerpt: &str,
        embedding: &[f32],
    ) -> Result<String, AnswerkitError> {
        queries::chunks::insert_chunk(&self.db, bot_id, heading, excerpt, embedding).await
    }

    /// Checkpoint and release the database.
    pub async fn close(&self) -> Result<(), AnswerkitError> {
        self.db.close().await
    }
}

#[async_trait]
impl TokenStore for SqliteStore {
    async fn find_by_hash(&self, hash: &str) -> Result<Option<WidgetToken>, AnswerkitError> {
        queries::tokens::find_by_hash(&self.db, hash).await
    }

    async fn touch_last_used(&self, id: &TokenId) -> Result<(), AnswerkitError> {
        queries::tokens::touch_last_used(&self.db, id).await
    }

    async fn create(&self, token: NewWidgetToken) -> Result<WidgetToken, AnswerkitError> {
        queries::tokens::create(&self.db, token).await
    }

    async fn list_by_bot(&self, bot_id: &BotId) -> Result<Vec<WidgetToken>, AnswerkitError> {
        queries::tokens::list_by_bot(&self.db, bot_id).await
    }

    async fn delete(&self, id: &TokenId, bot_id: &BotId) -> Result<bool, AnswerkitError> {
        queries::tokens::delete(&self.db, id, bot_id).await
    }
}

#[async_trait]
impl PlanStore for SqliteStore {
    async fn find_plan_by_key(&self, key: &str) -> Result<Option<PlanLimits>, AnswerkitError> {
        queries::plans::find_plan_by_key(&self.db, key).await
    }

    async fn find_active_subscription(
        &self,
        user_id: &str,
    ) -> Result<Option<(PlanLimits, SubscriptionInfo)>, AnswerkitError> {
        queries::plans::find_active_subscription(&self.db, user_id).await
    }

    async fn find_bot_owner(&self, bot_id: &BotId) -> Result<Option<String>, AnswerkitError> {
        queries::plans::find_bot_owner(&self.db, bot_id).await
    }
}

#[async_trait]
impl UsageCounts for SqliteStore {
    async fn queries_today(&self, bot_id: &BotId) -> Result<u64, AnswerkitError> {
        queries::audit::queries_today(&self.db, bot_id).await
    }
}

#[async_trait]
impl SimilaritySearch for SqliteStore {
    async fn search(
        &self,
        bot_id: &BotId,
        query_embedding: &[f32],
        threshold: f32,
        limit: usize,
    ) -> Result<Vec<RetrievedChunk>, AnswerkitError> {
        queries::chunks::search_similar(&self.db, bot_id, query_embedding, threshold, limit).await
    }
}

#[async_trait]
impl AuditSink for SqliteStore {
    async fn append(&self, record: &QueryRecord) -> Result<String, AnswerkitError> {
        queries::audit::append(&self.db, record).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use answerkit_core::types::{SessionId, TokenUsage};

    #[tokio::test]
    async fn store_serves_all_trait_surfaces() {
        let store = SqliteStore::in_memory().await.unwrap();

        // TokenStore
        let token = TokenStore::create(
            &store,
            NewWidgetToken {
                bot_id: BotId("bot-1".into()),
                token_hash: "h1".into(),
                token_prefix: "prefix01".into(),
                allowed_origins: vec![],
                name: None,
                expires_at: None,
            },
        )
        .await
        .unwrap();
        assert!(
            TokenStore::find_by_hash(&store, "h1")
                .await
                .unwrap()
                .is_some()
        );
        assert!(TokenStore::delete(&store, &token.id, &token.bot_id).await.unwrap());

        // PlanStore
        let plan = store.find_plan_by_key("free").await.unwrap().unwrap();
        assert_eq!(plan.plan_key, "free");

        // SimilaritySearch + ingestion
        let bot = BotId("bot-1".into());
        store.insert_chunk(&bot, Some("A"), "text", &[1.0, 0.0]).await.unwrap();
        let hits = store.search(&bot, &[1.0, 0.0], 0.5, 5).await.unwrap();
        assert_eq!(hits.len(), 1);

        // AuditSink + UsageCounts
        let record = QueryRecord {
            bot_id: bot.clone(),
            session_id: SessionId("s".into()),
            query_text: "q".into(),
            page_url: None,
            returned_sources: vec![],
            response_summary: "a".into(),
            usage: TokenUsage::default(),
            confidence: None,
            latency_ms: 10,
        };
        AuditSink::append(&store, &record).await.unwrap();
        assert_eq!(store.queries_today(&bot).await.unwrap(), 1);
    }
}
