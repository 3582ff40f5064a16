// SPDX-FileCopyrightText: 2026 Answerkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plan resolution and quota enforcement.
//!
//! Quota messages are part of the product's upsell flow: they name the plan,
//! the limit value, and the upgrade contact, unlike the deliberately generic
//! authorization failures.

use std::sync::Arc;

use tracing::debug;

use answerkit_core::AnswerkitError;
use answerkit_core::traits::{PlanStore, UsageCounts};
use answerkit_core::types::{BotId, LimitKind, PlanFeature, PlanLimits, SubscriptionInfo};

pub struct QuotaGuard {
    plans: Arc<dyn PlanStore>,
    usage: Arc<dyn UsageCounts>,
    default_plan_key: String,
    contact_email: String,
}

impl QuotaGuard {
    pub fn new(
        plans: Arc<dyn PlanStore>,
        usage: Arc<dyn UsageCounts>,
        default_plan_key: String,
        contact_email: String,
    ) -> Self {
        Self {
            plans,
            usage,
            default_plan_key,
            contact_email,
        }
    }

    /// Resolve the plan governing a bot: active subscription of the owner, or
    /// the configured default plan.
    ///
    /// A missing default plan is a configuration error, not a silent pass;
    /// quota enforcement fails closed.
    pub async fn resolve_plan_for_bot(
        &self,
        bot_id: &BotId,
    ) -> Result<(PlanLimits, Option<SubscriptionInfo>), AnswerkitError> {
        let Some(owner_id) = self.plans.find_bot_owner(bot_id).await? else {
            return Err(AnswerkitError::NotFound {
                resource: "bot",
                id: bot_id.0.clone(),
            });
        };

        if let Some((plan, info)) = self.plans.find_active_subscription(&owner_id).await? {
            debug!(bot_id = %bot_id.0, plan = %plan.plan_key, "plan resolved from subscription");
            return Ok((plan, Some(info)));
        }

        let Some(plan) = self.plans.find_plan_by_key(&self.default_plan_key).await? else {
            return Err(AnswerkitError::Config(format!(
                "default plan '{}' not found",
                self.default_plan_key
            )));
        };
        debug!(bot_id = %bot_id.0, plan = %plan.plan_key, "plan resolved from default");
        Ok((plan, None))
    }

    /// Check a numeric cap. Reaching the cap blocks the action that would
    /// create the cap+1-th item.
    pub fn check_limit(
        &self,
        plan: &PlanLimits,
        kind: LimitKind,
        current_count: u64,
    ) -> Result<(), AnswerkitError> {
        let Some(cap) = kind.cap(plan) else {
            return Ok(());
        };
        if current_count >= u64::from(cap) {
            return Err(AnswerkitError::QuotaExceeded {
                message: format!(
                    "You've reached the {} limit ({}) on the {} plan. Contact {} to upgrade.",
                    kind.noun(),
                    cap,
                    plan.display_name,
                    self.contact_email
                ),
            });
        }
        Ok(())
    }

    /// Check a boolean feature flag.
    pub fn check_feature(
        &self,
        plan: &PlanLimits,
        feature: PlanFeature,
    ) -> Result<(), AnswerkitError> {
        if feature.enabled(plan) {
            return Ok(());
        }
        Err(AnswerkitError::FeatureUnavailable {
            message: format!(
                "{} is not available on the {} plan. Contact {} to upgrade.",
                feature.display_name(),
                plan.display_name,
                self.contact_email
            ),
        })
    }

    /// Enforce the daily query cap for a bot.
    pub async fn check_query_quota(&self, bot_id: &BotId) -> Result<(), AnswerkitError> {
        let (plan, _) = self.resolve_plan_for_bot(bot_id).await?;
        let today = self.usage.queries_today(bot_id).await?;
        self.check_limit(&plan, LimitKind::MaxQueriesPerBotPerDay, today)
    }
}
