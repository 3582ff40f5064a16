// SPDX-FileCopyrightText: 2026 Answerkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Similarity-search trait.

use async_trait::async_trait;

use crate::error::AnswerkitError;
use crate::types::{BotId, RetrievedChunk};

/// Vector similarity search scoped to one tenant.
///
/// Implementations return results ordered by descending score, already
/// thresholded and capped; the search is exact per call, not approximate.
#[async_trait]
pub trait SimilaritySearch: Send + Sync {
    async fn search(
        &self,
        bot_id: &BotId,
        query_embedding: &[f32],
        threshold: f32,
        limit: usize,
    ) -> Result<Vec<RetrievedChunk>, AnswerkitError>;
}
