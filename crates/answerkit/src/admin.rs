// SPDX-FileCopyrightText: 2026 Answerkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Admin subcommands: bots, ingestion, widget tokens.
//!
//! These operate directly on the configured database; they are operator
//! tooling, not part of the public widget surface.

use std::sync::Arc;

use chrono::{Duration, Utc};
use clap::Subcommand;

use answerkit_config::AnswerkitConfig;
use answerkit_core::AnswerkitError;
use answerkit_core::types::{BotId, TokenId};
use answerkit_pipeline::{QuotaGuard, TokenManager};
use answerkit_providers::build_provider_stack;
use answerkit_storage::SqliteStore;
use answerkit_storage::queries::plans::insert_bot;

#[derive(Subcommand, Debug)]
pub enum BotCommands {
    /// Register a bot.
    Create {
        /// Bot identifier.
        id: String,
        /// Owning user identifier.
        owner: String,
        /// Display name.
        #[arg(long)]
        name: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum TokenCommands {
    /// Issue a widget token. Prints the secret exactly once.
    Issue {
        /// Bot the token embeds.
        bot_id: String,
        /// Allowed origins (repeatable). Empty means no origin restriction.
        #[arg(long = "origin")]
        origins: Vec<String>,
        /// Label shown alongside the token prefix.
        #[arg(long)]
        name: Option<String>,
        /// Expiry in days from now.
        #[arg(long)]
        expires_days: Option<i64>,
    },
    /// List tokens for a bot (prefixes only, never secrets).
    List {
        bot_id: String,
    },
    /// Revoke a token.
    Revoke {
        bot_id: String,
        token_id: String,
    },
}

pub async fn run_bot(config: AnswerkitConfig, command: BotCommands) -> Result<(), AnswerkitError> {
    let store = SqliteStore::open(&config.storage).await?;
    match command {
        BotCommands::Create { id, owner, name } => {
            insert_bot(
                store.database(),
                &BotId(id.clone()),
                &owner,
                name.as_deref(),
                None,
            )
            .await?;
            println!("created bot {id}");
        }
    }
    store.close().await
}

pub async fn run_ingest(
    config: AnswerkitConfig,
    bot_id: String,
    text: String,
    heading: Option<String>,
) -> Result<(), AnswerkitError> {
    if text.trim().is_empty() {
        return Err(AnswerkitError::Validation("passage text is required".into()));
    }
    let store = SqliteStore::open(&config.storage).await?;
    let providers = build_provider_stack(&config.providers)?;

    let vectors = providers.embedder.embed(&[text.clone()]).await?;
    let embedding = vectors
        .into_iter()
        .next()
        .ok_or_else(|| AnswerkitError::upstream("embedding", "provider returned no vectors"))?;

    let chunk_id = store
        .insert_chunk(&BotId(bot_id), heading.as_deref(), &text, &embedding)
        .await?;
    println!("ingested chunk {chunk_id}");
    store.close().await
}

pub async fn run_token(
    config: AnswerkitConfig,
    command: TokenCommands,
) -> Result<(), AnswerkitError> {
    let store = Arc::new(SqliteStore::open(&config.storage).await?);
    let quota = Arc::new(QuotaGuard::new(
        store.clone(),
        store.clone(),
        config.plans.default_plan_key.clone(),
        config.plans.contact_email.clone(),
    ));
    let manager = TokenManager::new(store.clone(), quota);

    match command {
        TokenCommands::Issue {
            bot_id,
            origins,
            name,
            expires_days,
        } => {
            let expires_at = expires_days.map(|days| Utc::now() + Duration::days(days));
            let issued = manager
                .issue(&BotId(bot_id), name, origins, expires_at)
                .await?;
            println!("token id: {}", issued.token.id.0);
            println!("prefix:   {}", issued.token.token_prefix);
            println!("secret:   {}", issued.secret);
            println!("store the secret now; it cannot be recovered later");
        }
        TokenCommands::List { bot_id } => {
            for token in manager.list(&BotId(bot_id)).await? {
                println!(
                    "{}  {}…  origins={:?}  expires={}  last_used={}",
                    token.id.0,
                    token.token_prefix,
                    token.allowed_origins,
                    token
                        .expires_at
                        .map(|t| t.to_rfc3339())
                        .unwrap_or_else(|| "never".into()),
                    token
                        .last_used_at
                        .map(|t| t.to_rfc3339())
                        .unwrap_or_else(|| "never".into()),
                );
            }
        }
        TokenCommands::Revoke { bot_id, token_id } => {
            manager
                .revoke(&TokenId(token_id.clone()), &BotId(bot_id))
                .await?;
            println!("revoked token {token_id}");
        }
    }
    store.close().await
}
