// SPDX-FileCopyrightText: 2026 Answerkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ordered provider fallback facades.
//!
//! Each facade walks its provider list in order and returns the first
//! success. Individual failures are logged at warn level; only exhausting
//! the whole list surfaces an error, carrying the last failure.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use answerkit_core::AnswerkitError;
use answerkit_core::traits::{CompletionProvider, EmbeddingProvider};
use answerkit_core::types::Completion;

/// Embedding facade over an ordered provider list.
pub struct FallbackEmbedder {
    providers: Vec<Arc<dyn EmbeddingProvider>>,
}

impl std::fmt::Debug for FallbackEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackEmbedder")
            .field("providers", &self.providers.len())
            .finish()
    }
}

impl FallbackEmbedder {
    /// Build from an ordered, non-empty provider list.
    pub fn new(providers: Vec<Arc<dyn EmbeddingProvider>>) -> Result<Self, AnswerkitError> {
        if providers.is_empty() {
            return Err(AnswerkitError::Config(
                "no embedding providers configured".into(),
            ));
        }
        Ok(Self { providers })
    }
}

#[async_trait]
impl EmbeddingProvider for FallbackEmbedder {
    fn name(&self) -> &'static str {
        "fallback"
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, AnswerkitError> {
        let mut last_err = None;
        for provider in &self.providers {
            match provider.embed(texts).await {
                Ok(vectors) => {
                    debug!(provider = provider.name(), "embedding succeeded");
                    return Ok(vectors);
                }
                Err(e) => {
                    warn!(provider = provider.name(), error = %e, "embedding provider failed");
                    last_err = Some(e);
                }
            }
        }
        Err(last_err.unwrap_or_else(|| {
            AnswerkitError::upstream("embedding", "all embedding providers failed")
        }))
    }
}

/// Generation facade over an ordered provider list.
pub struct FallbackCompleter {
    providers: Vec<Arc<dyn CompletionProvider>>,
}

impl std::fmt::Debug for FallbackCompleter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackCompleter")
            .field("providers", &self.providers.len())
            .finish()
    }
}

impl FallbackCompleter {
    /// Build from an ordered, non-empty provider list.
    pub fn new(providers: Vec<Arc<dyn CompletionProvider>>) -> Result<Self, AnswerkitError> {
        if providers.is_empty() {
            return Err(AnswerkitError::Config(
                "no completion providers configured".into(),
            ));
        }
        Ok(Self { providers })
    }
}

#[async_trait]
impl CompletionProvider for FallbackCompleter {
    fn name(&self) -> &'static str {
        "fallback"
    }

    async fn complete(&self, prompt: &str) -> Result<Completion, AnswerkitError> {
        let mut last_err = None;
        for provider in &self.providers {
            match provider.complete(prompt).await {
                Ok(mut completion) => {
                    // The facade is authoritative: report the provider that
                    // actually served the request.
                    completion.provider = provider.name();
                    debug!(provider = completion.provider, "generation succeeded");
                    return Ok(completion);
                }
                Err(e) => {
                    warn!(provider = provider.name(), error = %e, "completion provider failed");
                    last_err = Some(e);
                }
            }
        }
        Err(last_err.unwrap_or_else(|| {
            AnswerkitError::upstream("generation", "all completion providers failed")
        }))
    }
}
