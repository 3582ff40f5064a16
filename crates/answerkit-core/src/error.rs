// SPDX-FileCopyrightText: 2026 Answerkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Answerkit widget pipeline.

use thiserror::Error;

/// The primary error type used across all Answerkit collaborator traits and
/// pipeline stages.
///
/// The `RateLimited` through `NotFound` variants form the caller-visible
/// taxonomy; the remaining variants are ambient (configuration, storage,
/// timeouts) and surface as internal errors at the HTTP boundary.
#[derive(Debug, Error)]
pub enum AnswerkitError {
    /// Configuration errors (invalid TOML, missing required fields, a missing
    /// default plan record).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The client exceeded its per-minute request budget.
    #[error("rate limit exceeded")]
    RateLimited,

    /// Widget-token authorization failed.
    ///
    /// All sub-causes (missing token, unknown hash, expiry, origin policy)
    /// collapse into this one variant; the specific cause is logged internally
    /// and must never reach the caller.
    #[error("request is unauthorized")]
    Unauthorized,

    /// Malformed input (empty query, out-of-range parameters).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A plan limit blocks the action. The message is user-facing and
    /// plan-aware (plan name, limit value, upgrade contact).
    #[error("{message}")]
    QuotaExceeded { message: String },

    /// The plan lacks a feature flag. The message is user-facing.
    #[error("{message}")]
    FeatureUnavailable { message: String },

    /// An upstream collaborator failed after exhausting any provider fallback.
    #[error("upstream failure in {stage}: {message}")]
    Upstream {
        stage: &'static str,
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A referenced tenant or bot does not exist.
    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    /// An external call exceeded its time budget.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AnswerkitError {
    /// Helper for upstream failures without an underlying source error.
    pub fn upstream(stage: &'static str, message: impl Into<String>) -> Self {
        Self::Upstream {
            stage,
            message: message.into(),
            source: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_message_is_generic() {
        // Information hiding: the Display output must not identify which
        // authorization check failed.
        let err = AnswerkitError::Unauthorized;
        assert_eq!(err.to_string(), "request is unauthorized");
    }

    #[test]
    fn quota_message_passes_through() {
        let err = AnswerkitError::QuotaExceeded {
            message: "You've reached the widget tokens limit (2) on the Free plan.".into(),
        };
        assert!(err.to_string().contains("Free plan"));
    }

    #[test]
    fn upstream_names_the_stage() {
        let err = AnswerkitError::upstream("generation", "both providers failed");
        assert!(err.to_string().contains("generation"));
    }
}
