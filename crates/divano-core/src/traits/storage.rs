// SPDX-FileCopyrightText: 2026 Divano Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage trait for the relational catalog store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::DivanoError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{
    Category, NewSubscription, Product, ProductFilter, Subscription, SubscriptionStatus, User,
    UserProfile,
};

/// The relational store behind the catalog, identity, and subscription
/// services.
///
/// Every method is a single atomic unit at the store boundary: operations
/// that touch both a subscription row and the user's denormalized fields run
/// inside one transaction. Callers never observe partial state.
#[async_trait]
pub trait CatalogStore: PluginAdapter {
    /// Initializes the storage backend (migrations, connection, etc.).
    async fn initialize(&self) -> Result<(), DivanoError>;

    /// Closes the storage backend, flushing pending writes.
    async fn close(&self) -> Result<(), DivanoError>;

    // --- Users ---

    /// Looks up a user by the external platform identity key.
    async fn user_by_telegram_id(&self, telegram_id: &str)
        -> Result<Option<User>, DivanoError>;

    /// Looks up a user by primary key.
    async fn user_by_id(&self, id: i64) -> Result<Option<User>, DivanoError>;

    /// Creates a user with status FREE and both timestamps set to `now`.
    async fn create_user(
        &self,
        profile: &UserProfile,
        now: DateTime<Utc>,
    ) -> Result<User, DivanoError>;

    /// Writes the profile fields and `last_activity` of an existing user.
    ///
    /// Merge-on-update semantics (only overwrite non-empty fields) are
    /// applied by the caller; this persists the merged row as given.
    async fn update_user_profile(&self, user: &User) -> Result<(), DivanoError>;

    /// Updates the denormalized subscription status/expiry of a user.
    async fn set_subscription_state(
        &self,
        user_id: i64,
        status: SubscriptionStatus,
        expiry: Option<DateTime<Utc>>,
    ) -> Result<(), DivanoError>;

    // --- Subscriptions ---

    /// Returns the current subscription: the latest-by-`end_date` row whose
    /// `end_date` is still after `now`.
    async fn current_subscription(
        &self,
        user_id: i64,
        now: DateTime<Utc>,
    ) -> Result<Option<Subscription>, DivanoError>;

    /// Full append-only history for a user, newest end date first.
    async fn subscription_history(
        &self,
        user_id: i64,
    ) -> Result<Vec<Subscription>, DivanoError>;

    /// Appends a subscription row and syncs the user's denormalized
    /// status/expiry to it, in one transaction.
    async fn activate_subscription(
        &self,
        record: &NewSubscription,
    ) -> Result<Subscription, DivanoError>;

    /// Marks the current subscription EXPIRED with `end_date = now` and
    /// syncs the user, in one transaction. Returns `false` when no current
    /// subscription exists (nothing is written).
    async fn cancel_current_subscription(
        &self,
        user_id: i64,
        now: DateTime<Utc>,
    ) -> Result<bool, DivanoError>;

    // --- Catalog ---

    /// All categories.
    async fn categories(&self) -> Result<Vec<Category>, DivanoError>;

    /// A category by primary key.
    async fn category_by_id(&self, id: i64) -> Result<Option<Category>, DivanoError>;

    /// Products in a category, ordered by ascending price.
    async fn products_by_category(&self, category_id: i64)
        -> Result<Vec<Product>, DivanoError>;

    /// A product by primary key.
    async fn product_by_id(&self, id: i64) -> Result<Option<Product>, DivanoError>;

    /// A product by its unique human-readable code.
    async fn product_by_code(&self, code: &str) -> Result<Option<Product>, DivanoError>;

    /// Filtered product search, ordered by ascending price.
    async fn search_products(
        &self,
        filter: &ProductFilter,
    ) -> Result<Vec<Product>, DivanoError>;

    /// Distinct non-empty manufacturers across all products.
    async fn distinct_manufacturers(&self) -> Result<Vec<String>, DivanoError>;

    /// Distinct non-empty cities across all products.
    async fn distinct_product_cities(&self) -> Result<Vec<String>, DivanoError>;
}
