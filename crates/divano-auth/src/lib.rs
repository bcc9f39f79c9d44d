// SPDX-FileCopyrightText: 2026 Divano Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Identity and subscription engine.
//!
//! Registers and updates users, redeems the shared authorization code,
//! evaluates subscription status with lazy expiry, and handles renewal
//! arithmetic and cancellation. All mutating operations commit atomically
//! at the store boundary.

pub mod code;
pub mod identity;
pub mod subscription;

use std::sync::Arc;

use divano_config::{AuthConfig, PricingConfig};
use divano_core::CatalogStore;

pub use subscription::{infer_period_from_days_left, SubscriptionInfo};

/// The identity and subscription service.
///
/// Holds the store handle, the configured shared authorization code, and
/// the static pricing table. Cheap to clone.
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn CatalogStore>,
    auth_code: String,
    pricing: PricingConfig,
}

impl AccountService {
    /// Creates the service over a store with the given auth and pricing
    /// configuration.
    pub fn new(store: Arc<dyn CatalogStore>, auth: AuthConfig, pricing: PricingConfig) -> Self {
        Self {
            store,
            auth_code: auth.auth_code,
            pricing,
        }
    }

    pub(crate) fn store(&self) -> &Arc<dyn CatalogStore> {
        &self.store
    }

    /// Price of the given billing period, from the static table.
    pub fn price_for(&self, period: divano_core::SubscriptionPeriod) -> f64 {
        self.pricing.price_for(period)
    }
}
