// SPDX-FileCopyrightText: 2026 Answerkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator trait definitions for the widget pipeline.
//!
//! Every external dependency of the pipeline sits behind one of these
//! `#[async_trait]` seams and is injected as an `Arc<dyn Trait>` at
//! construction time — no ambient global handles.

pub mod audit;
pub mod plan_store;
pub mod provider;
pub mod search;
pub mod token_store;

// Re-export all traits at the traits module level for convenience.
pub use audit::AuditSink;
pub use plan_store::{PlanStore, UsageCounts};
pub use provider::{CompletionProvider, EmbeddingProvider};
pub use search::SimilaritySearch;
pub use token_store::TokenStore;
