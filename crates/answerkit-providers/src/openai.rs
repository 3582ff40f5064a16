// SPDX-FileCopyrightText: 2026 Answerkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI embedding and chat-completion adapter.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use answerkit_config::OpenAiConfig;
use answerkit_core::AnswerkitError;
use answerkit_core::traits::{CompletionProvider, EmbeddingProvider};
use answerkit_core::types::{Completion, TokenUsage};

pub struct OpenAiProvider {
    client: reqwest::Client,
    api_key: String,
    chat_model: String,
    embed_model: String,
    base_url: String,
}

impl OpenAiProvider {
    /// Build the adapter. Returns `None` when no API key is configured.
    pub fn from_config(
        config: &OpenAiConfig,
        timeout: Duration,
    ) -> Result<Option<Self>, AnswerkitError> {
        let Some(api_key) = config.api_key.clone() else {
            return Ok(None);
        };
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AnswerkitError::Internal(format!("failed to build HTTP client: {e}")))?;
        Ok(Some(Self {
            client,
            api_key,
            chat_model: config.chat_model.clone(),
            embed_model: config.embed_model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }))
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, AnswerkitError> {
        let body = EmbedRequest {
            model: &self.embed_model,
            input: texts,
        };
        let resp = self
            .client
            .post(format!("{}/v1/embeddings", self.base_url))
            .bearer_auth(self.api_key.trim())
            .json(&body)
            .send()
            .await
            .map_err(|e| AnswerkitError::Upstream {
                stage: "embedding",
                message: "OpenAI embeddings request failed".into(),
                source: Some(Box::new(e)),
            })?;
        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(AnswerkitError::upstream(
                "embedding",
                format!("OpenAI returned {status}: {text}"),
            ));
        }
        let mut parsed: EmbedResponse =
            resp.json().await.map_err(|e| AnswerkitError::Upstream {
                stage: "embedding",
                message: "failed to parse OpenAI embeddings response".into(),
                source: Some(Box::new(e)),
            })?;
        if parsed.data.len() != texts.len() {
            return Err(AnswerkitError::upstream(
                "embedding",
                format!(
                    "OpenAI returned {} embeddings for {} inputs",
                    parsed.data.len(),
                    texts.len()
                ),
            ));
        }
        // Input order is not guaranteed by the API contract.
        parsed.data.sort_by_key(|d| d.index);
        Ok(parsed.data.into_iter().map(|d| d.embedding).collect())
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn complete(&self, prompt: &str) -> Result<Completion, AnswerkitError> {
        let body = ChatRequest {
            model: &self.chat_model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };
        let resp = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(self.api_key.trim())
            .json(&body)
            .send()
            .await
            .map_err(|e| AnswerkitError::Upstream {
                stage: "generation",
                message: "OpenAI chat request failed".into(),
                source: Some(Box::new(e)),
            })?;
        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(AnswerkitError::upstream(
                "generation",
                format!("OpenAI returned {status}: {text}"),
            ));
        }
        let parsed: ChatResponse = resp.json().await.map_err(|e| AnswerkitError::Upstream {
            stage: "generation",
            message: "failed to parse OpenAI chat response".into(),
            source: Some(Box::new(e)),
        })?;
        let text = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| AnswerkitError::upstream("generation", "OpenAI returned no choices"))?;
        let usage = parsed
            .usage
            .map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            })
            .unwrap_or_default();
        Ok(Completion {
            text,
            usage,
            provider: CompletionProvider::name(self),
        })
    }
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedDatum>,
}

#[derive(Deserialize)]
struct EmbedDatum {
    index: usize,
    embedding: Vec<f32>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Deserialize)]
struct AssistantMessage {
    content: String,
}

#[derive(Deserialize)]
struct ChatUsage {
    prompt_tokens: Option<u32>,
    completion_tokens: Option<u32>,
    total_tokens: Option<u32>,
}
