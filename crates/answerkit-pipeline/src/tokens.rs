// SPDX-FileCopyrightText: 2026 Answerkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Widget-token lifecycle: issue, list, revoke.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use answerkit_core::AnswerkitError;
use answerkit_core::traits::TokenStore;
use answerkit_core::types::{BotId, IssuedToken, LimitKind, NewWidgetToken, TokenId, WidgetToken};

use crate::quota::QuotaGuard;
use crate::secrets::{generate_secret, hash_token, secret_prefix};

pub struct TokenManager {
    store: Arc<dyn TokenStore>,
    quota: Arc<QuotaGuard>,
}

impl TokenManager {
    pub fn new(store: Arc<dyn TokenStore>, quota: Arc<QuotaGuard>) -> Self {
        Self { store, quota }
    }

    /// Issue a new token for a bot.
    ///
    /// The plaintext secret is returned exactly once and never stored; only
    /// its hash and a short identification prefix persist.
    pub async fn issue(
        &self,
        bot_id: &BotId,
        name: Option<String>,
        allowed_origins: Vec<String>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<IssuedToken, AnswerkitError> {
        if let Some(expires_at) = expires_at {
            if expires_at <= Utc::now() {
                return Err(AnswerkitError::Validation(
                    "expires_at must be in the future".into(),
                ));
            }
        }

        let (plan, _) = self.quota.resolve_plan_for_bot(bot_id).await?;
        let existing = self.store.list_by_bot(bot_id).await?.len() as u64;
        self.quota
            .check_limit(&plan, LimitKind::MaxWidgetTokensPerBot, existing)?;

        let secret = generate_secret();
        let token = self
            .store
            .create(NewWidgetToken {
                bot_id: bot_id.clone(),
                token_hash: hash_token(&secret),
                token_prefix: secret_prefix(&secret),
                allowed_origins,
                name,
                expires_at,
            })
            .await?;
        info!(bot_id = %bot_id.0, token_id = %token.id.0, "widget token issued");
        Ok(IssuedToken { token, secret })
    }

    /// List tokens issued for a bot. Records carry hashes and prefixes only.
    pub async fn list(&self, bot_id: &BotId) -> Result<Vec<WidgetToken>, AnswerkitError> {
        self.store.list_by_bot(bot_id).await
    }

    /// Revoke a token, scoped to its bot.
    pub async fn revoke(&self, id: &TokenId, bot_id: &BotId) -> Result<(), AnswerkitError> {
        if !self.store.delete(id, bot_id).await? {
            return Err(AnswerkitError::NotFound {
                resource: "widget token",
                id: id.0.clone(),
            });
        }
        info!(bot_id = %bot_id.0, token_id = %id.0, "widget token revoked");
        Ok(())
    }
}
