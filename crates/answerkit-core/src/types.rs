// SPDX-FileCopyrightText: 2026 Answerkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common domain types used across collaborator traits and the pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Unique identifier for a bot (tenant).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BotId(pub String);

/// Unique identifier for an issued widget token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenId(pub String);

/// Opaque identifier for a widget visitor session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

// --- Widget tokens ---

/// One issued credential for embedding a bot on external pages.
///
/// The plaintext secret exists only at creation time; only its SHA-256 hash
/// is stored. `token_prefix` is a short non-secret fragment shown to owners
/// for identification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WidgetToken {
    pub id: TokenId,
    pub bot_id: BotId,
    pub token_hash: String,
    pub token_prefix: String,
    /// Allowed origin list. Empty means no origin restriction (subject to
    /// environment policy).
    pub allowed_origins: Vec<String>,
    pub name: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub last_used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Parameters for creating a widget token record.
#[derive(Debug, Clone)]
pub struct NewWidgetToken {
    pub bot_id: BotId,
    pub token_hash: String,
    pub token_prefix: String,
    pub allowed_origins: Vec<String>,
    pub name: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// A freshly issued token: the stored record plus the plaintext secret.
///
/// The secret is returned to the caller exactly once and never persisted.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: WidgetToken,
    pub secret: String,
}

/// Context resolved by a successful token validation.
#[derive(Debug, Clone)]
pub struct TokenContext {
    pub token_id: TokenId,
    pub bot_id: BotId,
}

// --- Plans and quotas ---

/// A tenant's entitlement snapshot: subscription plan joined with defaults.
///
/// A `None` numeric cap means unlimited.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanLimits {
    pub plan_key: String,
    pub display_name: String,
    pub max_bots_per_user: Option<u32>,
    pub max_docs_per_bot: Option<u32>,
    pub max_urls_per_bot: Option<u32>,
    pub max_widget_tokens_per_bot: Option<u32>,
    pub max_queries_per_bot_per_day: Option<u32>,
    /// Advanced training mode flag.
    pub train_enabled: bool,
    /// Full (vs basic) analytics flag.
    pub full_analytics: bool,
}

/// Metadata about the active subscription a plan was resolved from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionInfo {
    pub id: String,
    pub status: String,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
}

/// Identifies one of the numeric plan caps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
pub enum LimitKind {
    MaxBotsPerUser,
    MaxDocsPerBot,
    MaxUrlsPerBot,
    MaxWidgetTokensPerBot,
    MaxQueriesPerBotPerDay,
}

impl LimitKind {
    /// The configured cap for this limit on the given plan. `None` = unlimited.
    pub fn cap(&self, plan: &PlanLimits) -> Option<u32> {
        match self {
            LimitKind::MaxBotsPerUser => plan.max_bots_per_user,
            LimitKind::MaxDocsPerBot => plan.max_docs_per_bot,
            LimitKind::MaxUrlsPerBot => plan.max_urls_per_bot,
            LimitKind::MaxWidgetTokensPerBot => plan.max_widget_tokens_per_bot,
            LimitKind::MaxQueriesPerBotPerDay => plan.max_queries_per_bot_per_day,
        }
    }

    /// Human-readable noun for quota messages.
    pub fn noun(&self) -> &'static str {
        match self {
            LimitKind::MaxBotsPerUser => "bots",
            LimitKind::MaxDocsPerBot => "documents",
            LimitKind::MaxUrlsPerBot => "URLs",
            LimitKind::MaxWidgetTokensPerBot => "widget tokens",
            LimitKind::MaxQueriesPerBotPerDay => "queries per day",
        }
    }
}

/// Identifies a boolean plan feature flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
pub enum PlanFeature {
    TrainMode,
    FullAnalytics,
}

impl PlanFeature {
    /// Whether the given plan enables this feature.
    pub fn enabled(&self, plan: &PlanLimits) -> bool {
        match self {
            PlanFeature::TrainMode => plan.train_enabled,
            PlanFeature::FullAnalytics => plan.full_analytics,
        }
    }

    /// Display name used in upgrade messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            PlanFeature::TrainMode => "Train Mode",
            PlanFeature::FullAnalytics => "Advanced Analytics",
        }
    }
}

// --- Retrieval ---

/// One context passage returned by similarity search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedChunk {
    pub id: String,
    pub heading: Option<String>,
    pub excerpt: String,
    /// Cosine similarity against the query embedding, in [0, 1] for
    /// L2-normalized vectors.
    pub score: f32,
}

/// A citation returned to the widget caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    pub source_id: String,
    pub heading: Option<String>,
    pub score: f32,
}

impl From<&RetrievedChunk> for Citation {
    fn from(chunk: &RetrievedChunk) -> Self {
        Citation {
            source_id: chunk.id.clone(),
            heading: chunk.heading.clone(),
            score: chunk.score,
        }
    }
}

// --- Generation ---

/// Token-usage accounting normalized across providers.
///
/// Fields a provider does not report stay `None`; zero would falsely claim
/// "no tokens used".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: Option<u32>,
    pub completion_tokens: Option<u32>,
    pub total_tokens: Option<u32>,
}

/// A completed generation from an LLM provider.
#[derive(Debug, Clone)]
pub struct Completion {
    pub text: String,
    pub usage: TokenUsage,
    /// Name of the provider that actually served the generation. With
    /// fallback in play this is the provider that succeeded, not the
    /// preferred one.
    pub provider: &'static str,
}

// --- Audit ---

/// Audit/analytics row for one answered query.
///
/// Written best-effort after a successful answer; a write failure must never
/// roll back the user-visible response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRecord {
    pub bot_id: BotId,
    pub session_id: SessionId,
    pub query_text: String,
    pub page_url: Option<String>,
    pub returned_sources: Vec<Citation>,
    /// Truncated answer text.
    pub response_summary: String,
    pub usage: TokenUsage,
    pub confidence: Option<f32>,
    pub latency_ms: u64,
}

// --- Pipeline request/response ---

/// An inbound anonymous widget query, transport-agnostic.
#[derive(Debug, Clone)]
pub struct WidgetQueryRequest {
    pub bot_id: BotId,
    pub query_text: String,
    pub top_k: usize,
    pub min_score: f32,
    /// Raw bearer credential, if any was presented.
    pub raw_token: Option<String>,
    /// Normalized caller origin (scheme + host), if any was presented.
    pub origin: Option<String>,
    /// Client fingerprint for rate limiting (network address + truncated UA).
    pub fingerprint: String,
    pub session_id: Option<SessionId>,
    pub page_url: Option<String>,
}

/// The answer returned to the widget caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryAnswer {
    pub answer: String,
    pub citations: Vec<Citation>,
    /// Truncated context the answer was grounded in.
    pub context_preview: String,
}
