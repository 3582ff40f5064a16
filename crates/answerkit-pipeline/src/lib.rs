// SPDX-FileCopyrightText: 2026 Answerkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The widget query pipeline.
//!
//! Stages are independent components wired together by the orchestrator:
//! rate limiter, token authorizer, quota guard, retrieval engine, and the
//! completion facade, with a best-effort audit write at the end. Token
//! lifecycle management lives here too since it shares the hashing and
//! quota machinery.

pub mod authorizer;
pub mod orchestrator;
pub mod quota;
pub mod ratelimit;
pub mod retrieval;
pub mod secrets;
pub mod tokens;

pub use authorizer::TokenAuthorizer;
pub use orchestrator::QueryPipeline;
pub use quota::QuotaGuard;
pub use ratelimit::RateLimiter;
pub use retrieval::RetrievalEngine;
pub use tokens::TokenManager;
