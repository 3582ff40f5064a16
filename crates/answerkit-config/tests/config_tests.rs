// SPDX-FileCopyrightText: 2026 Answerkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for config loading and layering.

use answerkit_config::{AnswerkitConfig, load_config_from_str};

#[test]
fn empty_config_yields_defaults() {
    let config = load_config_from_str("").unwrap();
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.rate_limit.per_minute, 60);
    assert_eq!(config.plans.default_plan_key, "free");
    assert!(!config.runtime.is_relaxed());
}

#[test]
fn toml_overrides_defaults() {
    let config = load_config_from_str(
        r#"
        [runtime]
        environment = "development"

        [server]
        port = 9000

        [rate_limit]
        per_minute = 10

        [providers]
        preferred = "gemini"

        [providers.gemini]
        api_key = "test-key"
        "#,
    )
    .unwrap();

    assert!(config.runtime.is_relaxed());
    assert_eq!(config.server.port, 9000);
    assert_eq!(config.rate_limit.per_minute, 10);
    assert_eq!(config.providers.preferred, "gemini");
    assert_eq!(config.providers.gemini.api_key.as_deref(), Some("test-key"));
    // Untouched sections keep their defaults.
    assert_eq!(config.retrieval.default_top_k, 5);
}

#[test]
fn unknown_keys_are_rejected() {
    let result = load_config_from_str(
        r#"
        [server]
        prot = 9000
        "#,
    );
    assert!(result.is_err(), "typo'd key should fail extraction");
}

#[test]
fn retrieval_bounds_survive_partial_section() {
    let config = load_config_from_str(
        r#"
        [retrieval]
        default_top_k = 8
        "#,
    )
    .unwrap();
    assert_eq!(config.retrieval.default_top_k, 8);
    assert!((config.retrieval.default_min_score - 0.25).abs() < f32::EPSILON);
}

#[test]
fn env_overrides_toml() {
    figment::Jail::expect_with(|jail| {
        jail.create_file(
            "answerkit.toml",
            r#"
            [server]
            port = 9000
            "#,
        )?;
        jail.set_env("ANSWERKIT_SERVER_PORT", "9100");
        jail.set_env("ANSWERKIT_RATE_LIMIT_PER_MINUTE", "7");

        let config: AnswerkitConfig = answerkit_config::load_config().expect("config loads");
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.rate_limit.per_minute, 7);
        Ok(())
    });
}
