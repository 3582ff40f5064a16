// SPDX-FileCopyrightText: 2026 Answerkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Widget-token CRUD operations.

use chrono::Utc;
use rusqlite::params;

use answerkit_core::AnswerkitError;
use answerkit_core::types::{BotId, NewWidgetToken, TokenId, WidgetToken};

use crate::database::{Database, map_tr_err};
use crate::queries::{parse_opt_ts, parse_ts, to_ts};

const TOKEN_COLUMNS: &str = "id, bot_id, token_hash, token_prefix, allowed_origins, name, \
                             expires_at, last_used_at, created_at";

fn row_to_token(row: &rusqlite::Row<'_>) -> rusqlite::Result<WidgetToken> {
    let origins_json: String = row.get(4)?;
    let allowed_origins: Vec<String> = serde_json::from_str(&origins_json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(WidgetToken {
        id: TokenId(row.get(0)?),
        bot_id: BotId(row.get(1)?),
        token_hash: row.get(2)?,
        token_prefix: row.get(3)?,
        allowed_origins,
        name: row.get(5)?,
        expires_at: parse_opt_ts(6, row.get(6)?)?,
        last_used_at: parse_opt_ts(7, row.get(7)?)?,
        created_at: parse_ts(8, &row.get::<_, String>(8)?)?,
    })
}

/// Find a token record by the hex SHA-256 hash of its secret.
pub async fn find_by_hash(
    db: &Database,
    hash: &str,
) -> Result<Option<WidgetToken>, AnswerkitError> {
    let hash = hash.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {TOKEN_COLUMNS} FROM widget_tokens WHERE token_hash = ?1"
            ))?;
            let result = stmt.query_row(params![hash], row_to_token);
            match result {
                Ok(token) => Ok(Some(token)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Set the token's last-used instant to now.
pub async fn touch_last_used(db: &Database, id: &TokenId) -> Result<(), AnswerkitError> {
    let id = id.0.clone();
    let now = to_ts(&Utc::now());
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE widget_tokens SET last_used_at = ?1 WHERE id = ?2",
                params![now, id],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Insert a new token record, assigning its id and creation instant.
pub async fn create(db: &Database, new: NewWidgetToken) -> Result<WidgetToken, AnswerkitError> {
    let token = WidgetToken {
        id: TokenId(uuid::Uuid::new_v4().to_string()),
        bot_id: new.bot_id,
        token_hash: new.token_hash,
        token_prefix: new.token_prefix,
        allowed_origins: new.allowed_origins,
        name: new.name,
        expires_at: new.expires_at,
        last_used_at: None,
        created_at: Utc::now(),
    };
    let stored = token.clone();
    let origins_json = serde_json::to_string(&stored.allowed_origins).map_err(|e| {
        AnswerkitError::Storage {
            source: Box::new(e),
        }
    })?;
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO widget_tokens \
                 (id, bot_id, token_hash, token_prefix, allowed_origins, name, expires_at, last_used_at, created_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, NULL, ?8)",
                params![
                    stored.id.0,
                    stored.bot_id.0,
                    stored.token_hash,
                    stored.token_prefix,
                    origins_json,
                    stored.name,
                    stored.expires_at.as_ref().map(to_ts),
                    to_ts(&stored.created_at),
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;
    Ok(token)
}

/// List all tokens issued for a bot, newest first.
pub async fn list_by_bot(db: &Database, bot_id: &BotId) -> Result<Vec<WidgetToken>, AnswerkitError> {
    let bot_id = bot_id.0.clone();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {TOKEN_COLUMNS} FROM widget_tokens WHERE bot_id = ?1 ORDER BY created_at DESC"
            ))?;
            let rows = stmt.query_map(params![bot_id], row_to_token)?;
            let mut tokens = Vec::new();
            for row in rows {
                tokens.push(row?);
            }
            Ok(tokens)
        })
        .await
        .map_err(map_tr_err)
}

/// Hard-delete a token scoped to its bot. Returns false if nothing matched.
pub async fn delete(db: &Database, id: &TokenId, bot_id: &BotId) -> Result<bool, AnswerkitError> {
    let id = id.0.clone();
    let bot_id = bot_id.0.clone();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "DELETE FROM widget_tokens WHERE id = ?1 AND bot_id = ?2",
                params![id, bot_id],
            )?;
            Ok(changed > 0)
        })
        .await
        .map_err(map_tr_err)
}
