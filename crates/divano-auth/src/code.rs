// SPDX-FileCopyrightText: 2026 Divano Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authorization code redemption.
//!
//! A single process-wide code, compared by exact match and not tied to any
//! user. Redeeming it grants a flat 30-day paid period no matter how many
//! times or by whom it is redeemed.

use chrono::Utc;
use divano_core::{
    DivanoError, NewSubscription, Subscription, SubscriptionPeriod, SubscriptionStatus,
};
use tracing::info;

use crate::AccountService;

impl AccountService {
    /// Redeems the shared authorization code for the presenting user.
    ///
    /// Fails with [`DivanoError::InvalidCode`] on mismatch (before any
    /// lookup, so nothing is written) and with `NotFound` when the user has
    /// never contacted the bot. On success the user becomes PAID with
    /// expiry now + 30 days and exactly one subscription row is appended,
    /// priced as a month.
    pub async fn redeem_code(
        &self,
        telegram_id: &str,
        submitted: &str,
    ) -> Result<Subscription, DivanoError> {
        if submitted != self.auth_code {
            return Err(DivanoError::InvalidCode);
        }

        let user = self
            .store()
            .user_by_telegram_id(telegram_id)
            .await?
            .ok_or_else(|| DivanoError::not_found("user"))?;

        let now = Utc::now();
        let end_date = now + SubscriptionPeriod::Month.delta();
        let record = NewSubscription {
            user_id: user.id,
            status: SubscriptionStatus::Paid,
            period: Some(SubscriptionPeriod::Month),
            start_date: now,
            end_date,
            payment_id: None,
            payment_amount: Some(self.pricing.price_for(SubscriptionPeriod::Month)),
            payment_date: Some(now),
        };
        let subscription = self.store().activate_subscription(&record).await?;
        info!(user_id = user.id, %end_date, "authorization code redeemed");
        Ok(subscription)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, Utc};
    use divano_config::{AuthConfig, PricingConfig, StorageConfig};
    use divano_core::{CatalogStore, SubscriptionStatus, UserProfile};
    use divano_storage::SqliteStorage;
    use tempfile::TempDir;

    use super::*;

    async fn service() -> (AccountService, Arc<SqliteStorage>, TempDir) {
        let dir = TempDir::new().unwrap();
        let config = StorageConfig {
            database_path: dir.path().join("auth.db").to_str().unwrap().to_string(),
            wal_mode: true,
        };
        let storage = Arc::new(SqliteStorage::new(config));
        storage.initialize().await.unwrap();
        let service = AccountService::new(
            storage.clone(),
            AuthConfig::default(),
            PricingConfig::default(),
        );
        (service, storage, dir)
    }

    fn profile(telegram_id: &str) -> UserProfile {
        UserProfile {
            telegram_id: telegram_id.into(),
            first_name: Some("Иван".into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn wrong_code_fails_without_writing() {
        let (service, storage, _dir) = service().await;
        let (user, _) = service.register_or_update(&profile("tg-1")).await.unwrap();

        let err = service.redeem_code("tg-1", "WRONGCODE").await.unwrap_err();
        assert!(matches!(err, DivanoError::InvalidCode));

        let history = storage.subscription_history(user.id).await.unwrap();
        assert!(history.is_empty(), "failed redemption must not write");
        let fetched = storage.user_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(fetched.subscription_status, SubscriptionStatus::Free);
    }

    #[tokio::test]
    async fn unknown_user_fails_with_not_found() {
        let (service, _storage, _dir) = service().await;
        let err = service.redeem_code("tg-ghost", "M1234").await.unwrap_err();
        assert!(matches!(err, DivanoError::NotFound { .. }));
    }

    #[tokio::test]
    async fn correct_code_grants_thirty_paid_days() {
        let (service, storage, _dir) = service().await;
        let (user, _) = service.register_or_update(&profile("tg-2")).await.unwrap();

        let before = Utc::now();
        let subscription = service.redeem_code("tg-2", "M1234").await.unwrap();
        let after = Utc::now();

        assert_eq!(subscription.status, SubscriptionStatus::Paid);
        assert_eq!(subscription.payment_amount, Some(500.0));
        assert!(subscription.end_date >= before + Duration::days(30));
        assert!(subscription.end_date <= after + Duration::days(30));

        let history = storage.subscription_history(user.id).await.unwrap();
        assert_eq!(history.len(), 1, "exactly one record appended");

        let fetched = storage.user_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(fetched.subscription_status, SubscriptionStatus::Paid);
        assert_eq!(fetched.subscription_expiry, Some(subscription.end_date));
    }

    #[tokio::test]
    async fn code_can_be_redeemed_repeatedly() {
        // Inherited behavior: no consumption limit on the shared code.
        let (service, storage, _dir) = service().await;
        let (user, _) = service.register_or_update(&profile("tg-3")).await.unwrap();

        service.redeem_code("tg-3", "M1234").await.unwrap();
        service.redeem_code("tg-3", "M1234").await.unwrap();

        let history = storage.subscription_history(user.id).await.unwrap();
        assert_eq!(history.len(), 2);
    }
}
