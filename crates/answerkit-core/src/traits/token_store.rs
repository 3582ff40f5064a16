// SPDX-FileCopyrightText: 2026 Answerkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Widget-token store trait.

use async_trait::async_trait;

use crate::error::AnswerkitError;
use crate::types::{BotId, NewWidgetToken, TokenId, WidgetToken};

/// Persistence for issued widget tokens.
///
/// Lookups are always by hash, never by plaintext secret.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Find a token record by the SHA-256 hex hash of its secret.
    async fn find_by_hash(&self, hash: &str) -> Result<Option<WidgetToken>, AnswerkitError>;

    /// Update the token's last-used instant to now.
    async fn touch_last_used(&self, id: &TokenId) -> Result<(), AnswerkitError>;

    /// Persist a new token record.
    async fn create(&self, token: NewWidgetToken) -> Result<WidgetToken, AnswerkitError>;

    /// List all tokens issued for a bot.
    async fn list_by_bot(&self, bot_id: &BotId) -> Result<Vec<WidgetToken>, AnswerkitError>;

    /// Hard-delete a token. Returns false when no row matched both ids.
    async fn delete(&self, id: &TokenId, bot_id: &BotId) -> Result<bool, AnswerkitError>;
}
