// SPDX-FileCopyrightText: 2026 Answerkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Answerkit widget pipeline.
//!
//! Layered TOML configuration with environment variable overrides, strict
//! unknown-key rejection, and per-section defaults.

pub mod loader;
pub mod model;

pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{
    AnswerkitConfig, GeminiConfig, OpenAiConfig, PlansConfig, ProvidersConfig, RateLimitConfig,
    RetrievalConfig, RuntimeConfig, ServerConfig, StorageConfig,
};
