// SPDX-FileCopyrightText: 2026 Answerkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Google Gemini embedding and generation adapter.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use answerkit_config::GeminiConfig;
use answerkit_core::AnswerkitError;
use answerkit_core::traits::{CompletionProvider, EmbeddingProvider};
use answerkit_core::types::{Completion, TokenUsage};

pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: String,
    chat_model: String,
    embed_model: String,
    base_url: String,
}

impl GeminiProvider {
    /// Build the adapter. Returns `None` when no API key is configured.
    pub fn from_config(
        config: &GeminiConfig,
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
impl EmbeddingProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, AnswerkitError> {
        let model_path = format!("models/{}", self.embed_model);
        let body = BatchEmbedRequest {
            requests: texts
                .iter()
                .map(|text| EmbedContentRequest {
                    model: &model_path,
                    content: Content {
                        parts: vec![Part { text: text.clone() }],
                    },
                })
                .collect(),
        };
        let url = format!(
            "{}/v1beta/models/{}:batchEmbedContents",
            self.base_url, self.embed_model
        );
        let resp = self
            .client
            .post(url)
            .header("x-goog-api-key", self.api_key.trim())
            .json(&body)
            .send()
            .await
            .map_err(|e| AnswerkitError::Upstream {
                stage: "embedding",
                message: "Gemini embeddings request failed".into(),
                source: Some(Box::new(e)),
            })?;
        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(AnswerkitError::upstream(
                "embedding",
                format!("Gemini returned {status}: {text}"),
            ));
        }
        let parsed: BatchEmbedResponse =
            resp.json().await.map_err(|e| AnswerkitError::Upstream {
                stage: "embedding",
                message: "failed to parse Gemini embeddings response".into(),
                source: Some(Box::new(e)),
            })?;
        if parsed.embeddings.len() != texts.len() {
            return Err(AnswerkitError::upstream(
                "embedding",
                format!(
                    "Gemini returned {} embeddings for {} inputs",
                    parsed.embeddings.len(),
                    texts.len()
                ),
            ));
        }
        Ok(parsed.embeddings.into_iter().map(|e| e.values).collect())
    }
}

#[async_trait]
impl CompletionProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn complete(&self, prompt: &str) -> Result<Completion, AnswerkitError> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.chat_model
        );
        let resp = self
            .client
            .post(url)
            .header("x-goog-api-key", self.api_key.trim())
            .json(&body)
            .send()
            .await
            .map_err(|e| AnswerkitError::Upstream {
                stage: "generation",
                message: "Gemini generate request failed".into(),
                source: Some(Box::new(e)),
            })?;
        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(AnswerkitError::upstream(
                "generation",
                format!("Gemini returned {status}: {text}"),
            ));
        }
        let parsed: GenerateResponse =
            resp.json().await.map_err(|e| AnswerkitError::Upstream {
                stage: "generation",
                message: "failed to parse Gemini generate response".into(),
                source: Some(Box::new(e)),
            })?;
        let text = parsed
            .candidates
            .into_iter()
            .next()
            .map(|c| {
                c.content
                    .parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                AnswerkitError::upstream("generation", "Gemini returned no candidates")
            })?;
        let usage = parsed
            .usage_metadata
            .map(|u| TokenUsage {
                prompt_tokens: u.prompt_token_count,
                completion_tokens: u.candidates_token_count,
                total_tokens: u.total_token_count,
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
struct BatchEmbedRequest<'a> {
    requests: Vec<EmbedContentRequest<'a>>,
}

#[derive(Serialize)]
struct EmbedContentRequest<'a> {
    model: &'a str,
    content: Content,
}

#[derive(Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct BatchEmbedResponse {
    embeddings: Vec<EmbeddingValues>,
}

#[derive(Deserialize)]
struct EmbeddingValues {
    values: Vec<f32>,
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(rename = "usageMetadata")]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Deserialize)]
struct UsageMetadata {
    #[serde(rename = "promptTokenCount")]
    prompt_token_count: Option<u32>,
    #[serde(rename = "candidatesTokenCount")]
    candidates_token_count: Option<u32>,
    #[serde(rename = "totalTokenCount")]
    total_token_count: Option<u32>,
}
