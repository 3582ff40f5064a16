// SPDX-FileCopyrightText: 2026 Answerkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Answerkit widget pipeline.
//!
//! This crate provides the foundational trait definitions, error taxonomy,
//! and domain types used throughout the Answerkit workspace. All collaborator
//! implementations (storage, providers) implement traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::AnswerkitError;
pub use types::{BotId, SessionId, TokenId};

// Re-export all collaborator traits at crate root.
pub use traits::{
    AuditSink, CompletionProvider, EmbeddingProvider, PlanStore, SimilaritySearch, TokenStore,
    UsageCounts,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_trait_seams_are_exported() {
        // Compile-time check that every collaborator seam is object-safe and
        // reachable through the public API.
        fn _assert_token_store(_: &dyn TokenStore) {}
        fn _assert_plan_store(_: &dyn PlanStore) {}
        fn _assert_usage_counts(_: &dyn UsageCounts) {}
        fn _assert_embedding(_: &dyn EmbeddingProvider) {}
        fn _assert_completion(_: &dyn CompletionProvider) {}
        fn _assert_search(_: &dyn SimilaritySearch) {}
        fn _assert_audit(_: &dyn AuditSink) {}
    }

    #[test]
    fn ids_are_cloneable_and_comparable() {
        let bot = BotId("bot-1".into());
        assert_eq!(bot.clone(), bot);
        let token = TokenId("tok-1".into());
        assert_eq!(token.clone(), token);
        let session = SessionId("sess-1".into());
        assert_eq!(session.clone(), session);
    }
}
