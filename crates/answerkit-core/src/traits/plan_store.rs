// SPDX-FileCopyrightText: 2026 Answerkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plan-store and usage-count traits consumed by the quota guard.

use async_trait::async_trait;

use crate::error::AnswerkitError;
use crate::types::{BotId, PlanLimits, SubscriptionInfo};

/// Lookup of subscription plans and active subscriptions.
#[async_trait]
pub trait PlanStore: Send + Sync {
    /// Find an active plan by its key (e.g. "free", "starter").
    async fn find_plan_by_key(&self, key: &str) -> Result<Option<PlanLimits>, AnswerkitError>;

    /// Find the user's active subscription, joined with its plan.
    async fn find_active_subscription(
        &self,
        user_id: &str,
    ) -> Result<Option<(PlanLimits, SubscriptionInfo)>, AnswerkitError>;

    /// Resolve the owning user of a bot. `None` when the bot does not exist.
    async fn find_bot_owner(&self, bot_id: &BotId) -> Result<Option<String>, AnswerkitError>;
}

/// Current usage counters evaluated against plan caps.
#[async_trait]
pub trait UsageCounts: Send + Sync {
    /// Number of queries answered for the bot during the current UTC day.
    async fn queries_today(&self, bot_id: &BotId) -> Result<u64, AnswerkitError>;
}
