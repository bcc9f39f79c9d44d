// SPDX-FileCopyrightText: 2026 Divano Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Subscription lifecycle: lazy expiry, renewal stacking, cancellation,
//! and the user-facing summary.

use chrono::{DateTime, Utc};
use divano_core::{
    DivanoError, NewSubscription, Subscription, SubscriptionPeriod, SubscriptionStatus,
};
use tracing::{debug, info};

use crate::AccountService;

/// Tagged summary of a user's subscription state.
#[derive(Debug, Clone, PartialEq)]
pub enum SubscriptionInfo {
    /// The user does not exist.
    NotFound,
    /// The user exists but has no current subscription.
    NoSubscription,
    /// A current subscription is in effect.
    Active {
        period: SubscriptionPeriod,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
        days_left: i64,
        payment_amount: Option<f64>,
        payment_date: Option<DateTime<Utc>>,
    },
}

/// Classify a subscription by remaining duration.
///
/// Kept for rows that predate the stored `period` column. Lossy: a yearly
/// subscription renewed just before expiry classifies as monthly.
pub fn infer_period_from_days_left(days_left: i64) -> SubscriptionPeriod {
    if days_left > 3000 {
        SubscriptionPeriod::Forever
    } else if days_left > 300 {
        SubscriptionPeriod::Year
    } else {
        SubscriptionPeriod::Month
    }
}

impl AccountService {
    /// Evaluates the user's subscription status, transitioning PAID/TRIAL
    /// to EXPIRED once the expiry has passed (write-on-read).
    ///
    /// This is the only place expiry is enforced; there is no background
    /// sweep. A missing user evaluates as FREE.
    pub async fn evaluate_status(
        &self,
        user_id: i64,
    ) -> Result<SubscriptionStatus, DivanoError> {
        let Some(user) = self.store().user_by_id(user_id).await? else {
            return Ok(SubscriptionStatus::Free);
        };

        if matches!(
            user.subscription_status,
            SubscriptionStatus::Paid | SubscriptionStatus::Trial
        ) && let Some(expiry) = user.subscription_expiry
            && expiry < Utc::now()
        {
            self.store()
                .set_subscription_state(user.id, SubscriptionStatus::Expired, Some(expiry))
                .await?;
            debug!(user_id, %expiry, "subscription lazily expired");
            return Ok(SubscriptionStatus::Expired);
        }

        Ok(user.subscription_status)
    }

    /// True iff the user's evaluated status is PAID.
    pub async fn has_active_access(&self, telegram_id: &str) -> Result<bool, DivanoError> {
        let Some(user) = self.store().user_by_telegram_id(telegram_id).await? else {
            return Ok(false);
        };
        Ok(self.evaluate_status(user.id).await? == SubscriptionStatus::Paid)
    }

    /// Purchases or renews a subscription for the given period.
    ///
    /// Renewal stacks: with a current subscription, the new end date is the
    /// old end date plus the period, not now plus the period. Always
    /// appends a new history row priced from the static table and syncs the
    /// user's denormalized fields.
    pub async fn extend_or_create(
        &self,
        user_id: i64,
        period: SubscriptionPeriod,
        payment_id: Option<String>,
    ) -> Result<Subscription, DivanoError> {
        let user = self
            .store()
            .user_by_id(user_id)
            .await?
            .ok_or_else(|| DivanoError::not_found("user"))?;

        let now = Utc::now();
        let end_date = match self.store().current_subscription(user_id, now).await? {
            Some(current) => current.end_date + period.delta(),
            None => now + period.delta(),
        };

        let record = NewSubscription {
            user_id: user.id,
            status: SubscriptionStatus::Paid,
            period: Some(period),
            start_date: now,
            end_date,
            payment_id,
            payment_amount: Some(self.pricing.price_for(period)),
            payment_date: Some(now),
        };
        let subscription = self.store().activate_subscription(&record).await?;
        info!(user_id, %period, %end_date, "subscription activated");
        Ok(subscription)
    }

    /// Cancels the current subscription, shortening it to end now.
    ///
    /// Fails with [`DivanoError::NoActiveSubscription`] when there is
    /// nothing current to cancel.
    pub async fn cancel(&self, user_id: i64) -> Result<(), DivanoError> {
        self.store()
            .user_by_id(user_id)
            .await?
            .ok_or_else(|| DivanoError::not_found("user"))?;

        if self
            .store()
            .cancel_current_subscription(user_id, Utc::now())
            .await?
        {
            info!(user_id, "subscription cancelled");
            Ok(())
        } else {
            Err(DivanoError::NoActiveSubscription)
        }
    }

    /// Summarizes the user's current subscription.
    ///
    /// The period comes from the stored column when present and is inferred
    /// from the remaining duration otherwise.
    pub async fn summary(&self, user_id: i64) -> Result<SubscriptionInfo, DivanoError> {
        if self.store().user_by_id(user_id).await?.is_none() {
            return Ok(SubscriptionInfo::NotFound);
        }

        let now = Utc::now();
        let Some(current) = self.store().current_subscription(user_id, now).await? else {
            return Ok(SubscriptionInfo::NoSubscription);
        };

        let days_left = (current.end_date - now).num_days();
        let period = current
            .period
            .unwrap_or_else(|| infer_period_from_days_left(days_left));

        Ok(SubscriptionInfo::Active {
            period,
            start_date: current.start_date,
            end_date: current.end_date,
            days_left,
            payment_amount: current.payment_amount,
            payment_date: current.payment_date,
        })
    }
}
