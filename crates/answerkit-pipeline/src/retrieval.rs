// SPDX-FileCopyrightText: 2026 Answerkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Retrieval engine: query embedding plus tenant-scoped similarity search.

use std::sync::Arc;

use tracing::debug;

use answerkit_core::AnswerkitError;
use answerkit_core::traits::{EmbeddingProvider, SimilaritySearch};
use answerkit_core::types::{BotId, RetrievedChunk};

/// Caller-facing bounds on retrieval parameters.
pub const TOP_K_RANGE: std::ops::RangeInclusive<usize> = 1..=20;
pub const MIN_SCORE_RANGE: std::ops::RangeInclusive<f32> = 0.0..=1.0;

pub struct RetrievalEngine {
    embedder: Arc<dyn EmbeddingProvider>,
    search: Arc<dyn SimilaritySearch>,
}

impl RetrievalEngine {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, search: Arc<dyn SimilaritySearch>) -> Self {
        Self { embedder, search }
    }

    /// Embed the query and return thresholded passages ordered by score.
    ///
    /// Validation runs before any embedding call is attempted.
    pub async fn retrieve(
        &self,
        bot_id: &BotId,
        query_text: &str,
        top_k: usize,
        min_score: f32,
    ) -> Result<Vec<RetrievedChunk>, AnswerkitError> {
        if query_text.trim().is_empty() {
            return Err(AnswerkitError::Validation("query_text is required".into()));
        }
        if !TOP_K_RANGE.contains(&top_k) {
            return Err(AnswerkitError::Validation(format!(
                "top_k must be between {} and {}",
                TOP_K_RANGE.start(),
                TOP_K_RANGE.end()
            )));
        }
        if !MIN_SCORE_RANGE.contains(&min_score) {
            return Err(AnswerkitError::Validation(
                "min_score must be between 0.0 and 1.0".into(),
            ));
        }

        let vectors = self.embedder.embed(&[query_text.to_string()]).await?;
        let query_vec = vectors.into_iter().next().ok_or_else(|| {
            AnswerkitError::upstream("embedding", "provider returned no vectors")
        })?;

        let chunks = self
            .search
            .search(bot_id, &query_vec, min_score, top_k)
            .await?;
        debug!(bot_id = %bot_id.0, count = chunks.len(), "retrieved context passages");
        Ok(chunks)
    }
}
