// SPDX-FileCopyrightText: 2026 Answerkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports `./answerkit.toml` > `~/.config/answerkit/answerkit.toml` >
//! `/etc/answerkit/answerkit.toml` with environment variable overrides via
//! the `ANSWERKIT_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::AnswerkitConfig;

/// Load configuration from the standard hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/answerkit/answerkit.toml` (system-wide)
/// 3. `~/.config/answerkit/answerkit.toml` (user XDG config)
/// 4. `./answerkit.toml` (local directory)
/// 5. `ANSWERKIT_*` environment variables
pub fn load_config() -> Result<AnswerkitConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AnswerkitConfig::default()))
        .merge(Toml::file("/etc/answerkit/answerkit.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("answerkit/answerkit.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("answerkit.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no file lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<AnswerkitConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AnswerkitConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<AnswerkitConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AnswerkitConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `ANSWERKIT_RATE_LIMIT_PER_MINUTE` must
/// map to `rate_limit.per_minute`, not `rate.limit.per.minute`.
fn env_provider() -> Env {
    Env::prefixed("ANSWERKIT_").map(|key| {
        // `key` is the env var name with prefix stripped; figment lowercases
        // keys only after mapping, so normalize here before matching.
        // Example: ANSWERKIT_PROVIDERS_OPENAI_API_KEY -> "providers_openai_api_key"
        let key_str = key.as_str().to_ascii_lowercase();
        let key_str = key_str.as_str();
        let mapped = key_str
            .replacen("runtime_", "runtime.", 1)
            .replacen("server_", "server.", 1)
            .replacen("rate_limit_", "rate_limit.", 1)
            .replacen("retrieval_", "retrieval.", 1)
            .replacen("providers_openai_", "providers.openai.", 1)
            .replacen("providers_gemini_", "providers.gemini.", 1)
            .replacen("providers_", "providers.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("plans_", "plans.", 1);
        mapped.into()
    })
}
