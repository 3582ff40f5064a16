// SPDX-FileCopyrightText: 2026 Answerkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Answered-query audit rows and usage counters.

use chrono::Utc;
use rusqlite::params;

use answerkit_core::AnswerkitError;
use answerkit_core::types::{BotId, QueryRecord};

use crate::database::{Database, map_tr_err};
use crate::queries::to_ts;

/// Append one audit row, returning its assigned id.
pub async fn append(db: &Database, record: &QueryRecord) -> Result<String, AnswerkitError> {
    let id = uuid::Uuid::new_v4().to_string();
    let row_id = id.clone();
    let sources_json =
        serde_json::to_string(&record.returned_sources).map_err(|e| AnswerkitError::Storage {
            source: Box::new(e),
        })?;
    let record = record.clone();
    let now = to_ts(&Utc::now());
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO queries \
                 (id, bot_id, session_id, query_text, page_url, returned_sources, \
                  response_summary, prompt_tokens, completion_tokens, total_tokens, \
                  confidence, latency_ms, created_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                params![
                    row_id,
                    record.bot_id.0,
                    record.session_id.0,
                    record.query_text,
                    record.page_url,
                    sources_json,
                    record.response_summary,
                    record.usage.prompt_tokens,
                    record.usage.completion_tokens,
                    record.usage.total_tokens,
                    record.confidence,
                    record.latency_ms as i64,
                    now,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;
    Ok(id)
}

/// Number of audit rows written for the bot since UTC midnight.
///
/// Timestamps are stored in a fixed RFC 3339 UTC format, so the day boundary
/// comparison works lexicographically.
pub async fn queries_today(db: &Database, bot_id: &BotId) -> Result<u64, AnswerkitError> {
    let bot_id = bot_id.0.clone();
    let day_start = format!("{}T00:00:00", Utc::now().format("%Y-%m-%d"));
    db.connection()
        .call(move |conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM queries WHERE bot_id = ?1 AND created_at >= ?2",
                params![bot_id, day_start],
                |row| row.get(0),
            )?;
            Ok(count as u64)
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use answerkit_core::types::{Citation, SessionId, TokenUsage};

    async fn setup_db() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    fn make_record(bot: &str) -> QueryRecord {
        QueryRecord {
            bot_id: BotId(bot.to_string()),
            session_id: SessionId("sess-1".to_string()),
            query_text: "how do refunds work?".to_string(),
            page_url: Some("https://a.com/pricing".to_string()),
            returned_sources: vec![Citation {
                source_id: "c1".to_string(),
                heading: Some("Refunds".to_string()),
                score: 0.81,
            }],
            response_summary: "Refunds are available within 30 days.".to_string(),
            usage: TokenUsage {
                prompt_tokens: Some(120),
                completion_tokens: Some(40),
                total_tokens: Some(160),
            },
            confidence: Some(0.81),
            latency_ms: 850,
        }
    }

    #[tokio::test]
    async fn append_assigns_an_id_and_persists() {
        let db = setup_db().await;
        let id = append(&db, &make_record("bot-1")).await.unwrap();
        assert!(!id.is_empty());

        let (summary, sources): (String, String) = db
            .connection()
            .call(move |conn| -> Result<(String, String), rusqlite::Error> {
                Ok(conn.query_row(
                    "SELECT response_summary, returned_sources FROM queries WHERE id = ?1",
                    params![id],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )?)
            })
            .await
            .unwrap();
        assert_eq!(summary, "Refunds are available within 30 days.");
        let citations: Vec<Citation> = serde_json::from_str(&sources).unwrap();
        assert_eq!(citations.len(), 1);
        assert_eq!(citations[0].source_id, "c1");
    }

    #[tokio::test]
    async fn missing_usage_stays_null() {
        let db = setup_db().await;
        let mut record = make_record("bot-1");
        record.usage = TokenUsage::default();
        let id = append(&db, &record).await.unwrap();

        let total: Option<i64> = db
            .connection()
            .call(move |conn| -> Result<Option<i64>, rusqlite::Error> {
                Ok(conn.query_row(
                    "SELECT total_tokens FROM queries WHERE id = ?1",
                    params![id],
                    |row| row.get(0),
                )?)
            })
            .await
            .unwrap();
        assert!(total.is_none());
    }

    #[tokio::test]
    async fn queries_today_counts_per_bot() {
        let db = setup_db().await;
        append(&db, &make_record("bot-1")).await.unwrap();
        append(&db, &make_record("bot-1")).await.unwrap();
        append(&db, &make_record("bot-2")).await.unwrap();

        assert_eq!(queries_today(&db, &BotId("bot-1".into())).await.unwrap(), 2);
        assert_eq!(queries_today(&db, &BotId("bot-2".into())).await.unwrap(), 1);
        assert_eq!(queries_today(&db, &BotId("bot-3".into())).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn yesterdays_rows_do_not_count() {
        let db = setup_db().await;
        let id = append(&db, &make_record("bot-1")).await.unwrap();
        // Backdate the row to the previous UTC day.
        db.connection()
            .call(move |conn| -> Result<(), rusqlite::Error> {
                conn.execute(
                    "UPDATE queries SET created_at = '2000-01-01T12:00:00.000Z' WHERE id = ?1",
                    params![id],
                )?;
                Ok(())
            })
            .await
            .unwrap();

        assert_eq!(queries_today(&db, &BotId("bot-1".into())).await.unwrap(), 0);
    }
}
