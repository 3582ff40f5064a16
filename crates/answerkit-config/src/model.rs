// SPDX-FileCopyrightText: 2026 Answerkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Answerkit service.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Answerkit configuration.
///
/// Loaded from TOML files with environment variable overrides. All sections
/// are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AnswerkitConfig {
    /// Deployment environment settings.
    #[serde(default)]
    pub runtime: RuntimeConfig,

    /// HTTP server bind settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Public-widget rate limiting.
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Retrieval defaults and bounds.
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Embedding and generation provider settings.
    #[serde(default)]
    pub providers: ProvidersConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Subscription plan messaging.
    #[serde(default)]
    pub plans: PlansConfig,
}

/// Deployment environment configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Deployment environment name: "production", "development", "local".
    #[serde(default = "default_environment")]
    pub environment: String,
}

impl RuntimeConfig {
    /// Whether origin checks run in relaxed (development) mode.
    ///
    /// Relaxed mode tolerates a missing Origin header during token
    /// validation; production never does.
    pub fn is_relaxed(&self) -> bool {
        matches!(
            self.environment.to_ascii_lowercase().as_str(),
            "dev" | "development" | "local"
        )
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            environment: default_environment(),
        }
    }
}

fn default_environment() -> String {
    "production".to_string()
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Rate limiting configuration for the public widget path.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RateLimitConfig {
    /// Maximum requests per client fingerprint per sliding 60-second window.
    #[serde(default = "default_per_minute")]
    pub per_minute: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            per_minute: default_per_minute(),
        }
    }
}

fn default_per_minute() -> u32 {
    60
}

/// Retrieval defaults applied when the caller omits parameters.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RetrievalConfig {
    /// Default number of passages to retrieve (caller may request 1..=20).
    #[serde(default = "default_top_k")]
    pub default_top_k: usize,

    /// Default minimum similarity score (caller may request 0.0..=1.0).
    #[serde(default = "default_min_score")]
    pub default_min_score: f32,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            default_top_k: default_top_k(),
            default_min_score: default_min_score(),
        }
    }
}

fn default_top_k() -> usize {
    5
}

fn default_min_score() -> f32 {
    0.25
}

/// Provider selection and credentials.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProvidersConfig {
    /// Preferred provider tried first for both embedding and generation:
    /// "openai" or "gemini". The other becomes the fallback.
    #[serde(default = "default_preferred")]
    pub preferred: String,

    /// Per-call timeout for provider HTTP requests, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// OpenAI settings.
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Gemini settings.
    #[serde(default)]
    pub gemini: GeminiConfig,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            preferred: default_preferred(),
            request_timeout_secs: default_request_timeout_secs(),
            openai: OpenAiConfig::default(),
            gemini: GeminiConfig::default(),
        }
    }
}

fn default_preferred() -> String {
    "openai".to_string()
}

fn default_request_timeout_secs() -> u64 {
    60
}

/// OpenAI provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpenAiConfig {
    /// API key. `None` disables this provider.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Chat completion model.
    #[serde(default = "default_openai_chat_model")]
    pub chat_model: String,

    /// Embedding model.
    #[serde(default = "default_openai_embed_model")]
    pub embed_model: String,

    /// API base URL (overridable for tests).
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            chat_model: default_openai_chat_model(),
            embed_model: default_openai_embed_model(),
            base_url: default_openai_base_url(),
        }
    }
}

fn default_openai_chat_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_openai_embed_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_openai_base_url() -> String {
    "https://api.openai.com".to_string()
}

/// Gemini provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeminiConfig {
    /// API key. `None` disables this provider.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Chat completion model.
    #[serde(default = "default_gemini_chat_model")]
    pub chat_model: String,

    /// Embedding model.
    #[serde(default = "default_gemini_embed_model")]
    pub embed_model: String,

    /// API base URL (overridable for tests).
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            chat_model: default_gemini_chat_model(),
            embed_model: default_gemini_embed_model(),
            base_url: default_gemini_base_url(),
        }
    }
}

fn default_gemini_chat_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_gemini_embed_model() -> String {
    "text-embedding-004".to_string()
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("answerkit").join("answerkit.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("answerkit.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Subscription plan messaging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PlansConfig {
    /// Plan key resolved for users without an active subscription.
    #[serde(default = "default_plan_key")]
    pub default_plan_key: String,

    /// Contact address included in quota/feature upgrade messages.
    #[serde(default = "default_contact_email")]
    pub contact_email: String,
}

impl Default for PlansConfig {
    fn default() -> Self {
        Self {
            default_plan_key: default_plan_key(),
            contact_email: default_contact_email(),
        }
    }
}

fn default_plan_key() -> String {
    "free".to_string()
}

fn default_contact_email() -> String {
    "support@answerkit.dev".to_string()
}
