// SPDX-FileCopyrightText: 2026 Answerkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedding and generation provider adapters with ordered fallback.
//!
//! Providers without a configured API key are silently skipped; the
//! configured preferred provider is tried first and the rest in declaration
//! order.

pub mod fallback;
pub mod gemini;
pub mod openai;

use std::sync::Arc;
use std::time::Duration;

use answerkit_config::ProvidersConfig;
use answerkit_core::AnswerkitError;
use answerkit_core::traits::{CompletionProvider, EmbeddingProvider};

pub use fallback::{FallbackCompleter, FallbackEmbedder};
pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;

/// The wired provider facades handed to the pipeline.
pub struct ProviderStack {
    pub embedder: Arc<dyn EmbeddingProvider>,
    pub completer: Arc<dyn CompletionProvider>,
}

impl std::fmt::Debug for ProviderStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderStack").finish_non_exhaustive()
    }
}

/// Build both fallback facades from configuration.
///
/// Fails with a configuration error when no provider has an API key.
pub fn build_provider_stack(config: &ProvidersConfig) -> Result<ProviderStack, AnswerkitError> {
    let timeout = Duration::from_secs(config.request_timeout_secs);

    let openai = OpenAiProvider::from_config(&config.openai, timeout)?.map(Arc::new);
    let gemini = GeminiProvider::from_config(&config.gemini, timeout)?.map(Arc::new);

    let mut embedders: Vec<Arc<dyn EmbeddingProvider>> = Vec::new();
    let mut completers: Vec<Arc<dyn CompletionProvider>> = Vec::new();

    let gemini_first = config.preferred.eq_ignore_ascii_case("gemini");
    let push_openai = |e: &mut Vec<Arc<dyn EmbeddingProvider>>,
                       c: &mut Vec<Arc<dyn CompletionProvider>>| {
        if let Some(p) = &openai {
            e.push(p.clone());
            c.push(p.clone());
        }
    };
    let push_gemini = |e: &mut Vec<Arc<dyn EmbeddingProvider>>,
                       c: &mut Vec<Arc<dyn CompletionProvider>>| {
        if let Some(p) = &gemini {
            e.push(p.clone());
            c.push(p.clone());
        }
    };

    if gemini_first {
        push_gemini(&mut embedders, &mut completers);
        push_openai(&mut embedders, &mut completers);
    } else {
        push_openai(&mut embedders, &mut completers);
        push_gemini(&mut embedders, &mut completers);
    }

    Ok(ProviderStack {
        embedder: Arc::new(FallbackEmbedder::new(embedders)?),
        completer: Arc::new(FallbackCompleter::new(completers)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use answerkit_config::{GeminiConfig, OpenAiConfig};

    fn config_with_keys(openai: bool, gemini: bool, preferred: &str) -> ProvidersConfig {
        ProvidersConfig {
            preferred: preferred.to_string(),
            openai: OpenAiConfig {
                api_key: openai.then(|| "ok".to_string()),
                ..OpenAiConfig::default()
            },
            gemini: GeminiConfig {
                api_key: gemini.then(|| "gk".to_string()),
                ..GeminiConfig::default()
            },
            ..ProvidersConfig::default()
        }
    }

    #[test]
    fn no_keys_is_a_config_error() {
        let err = build_provider_stack(&config_with_keys(false, false, "openai")).unwrap_err();
        assert!(matches!(err, AnswerkitError::Config(_)));
    }

    #[test]
    fn single_key_builds_a_stack() {
        build_provider_stack(&config_with_keys(true, false, "openai")).unwrap();
        build_provider_stack(&config_with_keys(false, true, "openai")).unwrap();
    }

    #[test]
    fn both_keys_build_a_stack_regardless_of_preference() {
        build_provider_stack(&config_with_keys(true, true, "openai")).unwrap();
        build_provider_stack(&config_with_keys(true, true, "gemini")).unwrap();
    }
}
