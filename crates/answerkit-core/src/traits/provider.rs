// SPDX-FileCopyrightText: 2026 Answerkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedding and generative-text provider traits.
//!
//! At least two independent implementations exist for each; the pipeline
//! consumes them through ordered fallback facades so adding a third provider
//! is a wiring change, not a code change.

use async_trait::async_trait;

use crate::error::AnswerkitError;
use crate::types::Completion;

/// Adapter for turning text into embedding vectors.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Stable provider name for logs and fallback accounting.
    fn name(&self) -> &'static str;

    /// Embed each input text into one vector, preserving order.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, AnswerkitError>;
}

/// Adapter for generative-text completion.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Stable provider name for logs and fallback accounting.
    fn name(&self) -> &'static str;

    /// Complete the prompt, returning text plus normalized usage counts.
    async fn complete(&self, prompt: &str) -> Result<Completion, AnswerkitError>;
}
