// SPDX-FileCopyrightText: 2026 Answerkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Subscription plan and bot-ownership lookups.

use chrono::Utc;
use rusqlite::params;

use answerkit_core::AnswerkitError;
use answerkit_core::types::{BotId, PlanLimits, SubscriptionInfo};

use crate::database::{Database, map_tr_err};
use crate::queries::{parse_opt_ts, to_ts};

const PLAN_COLUMNS: &str = "plan_key, display_name, max_bots_per_user, max_docs_per_bot, \
                            max_urls_per_bot, max_widget_tokens_per_bot, \
                            max_queries_per_bot_per_day, train_enabled, full_analytics";

fn row_to_plan(row: &rusqlite::Row<'_>) -> rusqlite::Result<PlanLimits> {
    Ok(PlanLimits {
        plan_key: row.get(0)?,
        display_name: row.get(1)?,
        max_bots_per_user: row.get(2)?,
        max_docs_per_bot: row.get(3)?,
        max_urls_per_bot: row.get(4)?,
        max_widget_tokens_per_bot: row.get(5)?,
        max_queries_per_bot_per_day: row.get(6)?,
        train_enabled: row.get::<_, i64>(7)? != 0,
        full_analytics: row.get::<_, i64>(8)? != 0,
    })
}

/// Find an active plan by key.
pub async fn find_plan_by_key(
    db: &Database,
    key: &str,
) -> Result<Option<PlanLimits>, AnswerkitError> {
    let key = key.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {PLAN_COLUMNS} FROM subscription_plans \
                 WHERE plan_key = ?1 AND is_active = 1"
            ))?;
            match stmt.query_row(params![key], row_to_plan) {
                Ok(plan) => Ok(Some(plan)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Find the user's active subscription joined with its plan.
///
/// Most recent subscription wins when a user somehow has several active rows.
pub async fn find_active_subscription(
    db: &Database,
    user_id: &str,
) -> Result<Option<(PlanLimits, SubscriptionInfo)>, AnswerkitError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT p.plan_key, p.display_name, p.max_bots_per_user, p.max_docs_per_bot, \
                 p.max_urls_per_bot, p.max_widget_tokens_per_bot, \
                 p.max_queries_per_bot_per_day, p.train_enabled, p.full_analytics, \
                 s.id, s.status, s.starts_at, s.ends_at \
                 FROM user_subscriptions s \
                 JOIN subscription_plans p ON p.plan_key = s.plan_key \
                 WHERE s.user_id = ?1 AND s.is_active = 1 AND p.is_active = 1 \
                 ORDER BY s.starts_at DESC LIMIT 1",
            )?;
            let result = stmt.query_row(params![user_id], |row| {
                let plan = row_to_plan(row)?;
                let info = SubscriptionInfo {
                    id: row.get(9)?,
                    status: row.get(10)?,
                    starts_at: parse_opt_ts(11, row.get(11)?)?,
                    ends_at: parse_opt_ts(12, row.get(12)?)?,
                };
                Ok((plan, info))
            });
            match result {
                Ok(pair) => Ok(Some(pair)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Resolve the owning user of a bot.
pub async fn find_bot_owner(
    db: &Database,
    bot_id: &BotId,
) -> Result<Option<String>, AnswerkitError> {
    let bot_id = bot_id.0.clone();
    db.connection()
        .call(move |conn| {
            let result = conn.query_row(
                "SELECT owner_id FROM bots WHERE id = ?1",
                params![bot_id],
                |row| row.get(0),
            );
            match result {
                Ok(owner) => Ok(Some(owner)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Insert a bot row (admin tooling and tests).
pub async fn insert_bot(
    db: &Database,
    id: &BotId,
    owner_id: &str,
    name: Option<&str>,
    system_prompt: Option<&str>,
) -> Result<(), AnswerkitError> {
    let id = id.0.clone();
    let owner_id = owner_id.to_string();
    let name = name.map(str::to_string);
    let system_prompt = system_prompt.map(str::to_string);
    let now = to_ts(&Utc::now());
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO bots (id, owner_id, name, system_prompt, created_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![id, owner_id, name, system_prompt, now],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Insert a subscription row (admin tooling and tests).
pub async fn insert_subscription(
    db: &Database,
    user_id: &str,
    plan_key: &str,
    status: &str,
) -> Result<String, AnswerkitError> {
    let id = uuid::Uuid::new_v4().to_string();
    let row_id = id.clone();
    let user_id = user_id.to_string();
    let plan_key = plan_key.to_string();
    let status = status.to_string();
    let now = to_ts(&Utc::now());
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO user_subscriptions (id, user_id, plan_key, status, is_active, starts_at) \
                 VALUES (?1, ?2, ?3, ?4, 1, ?5)",
                params![row_id, user_id, plan_key, status, now],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_db() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    async fn insert_plan(db: &Database, key: &str, active: bool) {
        let key = key.to_string();
        db.connection()
            .call(move |conn| -> Result<(), rusqlite::Error> {
                conn.execute(
                    "INSERT INTO subscription_plans \
                     (plan_key, display_name, max_bots_per_user, max_queries_per_bot_per_day, \
                      train_enabled, full_analytics, is_active) \
                     VALUES (?1, 'Starter', 5, NULL, 1, 0, ?2)",
                    params![key, active as i64],
                )?;
                Ok(())
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn free_plan_is_seeded() {
        let db = setup_db().await;
        let plan = find_plan_by_key(&db, "free").await.unwrap().unwrap();
        assert_eq!(plan.display_name, "Free");
        assert_eq!(plan.max_queries_per_bot_per_day, Some(100));
        assert!(!plan.train_enabled);
    }

    #[tokio::test]
    async fn inactive_plans_are_invisible() {
        let db = setup_db().await;
        insert_plan(&db, "legacy", false).await;
        assert!(find_plan_by_key(&db, "legacy").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn null_caps_read_back_as_unlimited() {
        let db = setup_db().await;
        insert_plan(&db, "starter", true).await;
        let plan = find_plan_by_key(&db, "starter").await.unwrap().unwrap();
        assert_eq!(plan.max_bots_per_user, Some(5));
        assert!(plan.max_queries_per_bot_per_day.is_none());
        assert!(plan.train_enabled);
    }

    #[tokio::test]
    async fn active_subscription_joins_plan() {
        let db = setup_db().await;
        insert_plan(&db, "starter", true).await;
        insert_subscription(&db, "user-1", "starter", "active").await.unwrap();

        let (plan, info) = find_active_subscription(&db, "user-1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(plan.plan_key, "starter");
        assert_eq!(info.status, "active");
        assert!(info.starts_at.is_some());
    }

    #[tokio::test]
    async fn user_without_subscription_resolves_to_none() {
        let db = setup_db().await;
        assert!(find_active_subscription(&db, "nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn bot_owner_lookup() {
        let db = setup_db().await;
        let bot = BotId("bot-1".into());
        insert_bot(&db, &bot, "user-1", Some("Support"), Some("Be helpful.")).await.unwrap();

        assert_eq!(
            find_bot_owner(&db, &bot).await.unwrap().as_deref(),
            Some("user-1")
        );
        assert!(
            find_bot_owner(&db, &BotId("missing".into()))
                .await
                .unwrap()
                .is_none()
        );
    }
}
