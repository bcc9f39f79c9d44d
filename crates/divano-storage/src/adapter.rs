// SPDX-FileCopyrightText: 2026 Divano Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the [`CatalogStore`] trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::OnceCell;
use tracing::debug;

use divano_config::StorageConfig;
use divano_core::{
    AdapterType, CatalogStore, Category, City, DivanoError, HealthStatus, NewSubscription,
    PluginAdapter, Product, ProductFilter, Subscription, SubscriptionStatus, User, UserProfile,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed catalog store.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. The database is lazily initialized on the first
/// call to [`CatalogStore::initialize`].
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a new SqliteStorage with the given configuration.
    ///
    /// The database connection is not opened until `initialize` is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Returns a reference to the underlying Database, or an error if not
    /// initialized.
    fn db(&self) -> Result<&Database, DivanoError> {
        self.db.get().ok_or_else(|| DivanoError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }

    // Seed surface used by the out-of-band catalog tooling and by tests;
    // the conversational core never writes catalog rows.

    /// Insert a category.
    pub async fn insert_category(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<Category, DivanoError> {
        queries::categories::insert_category(self.db()?, name, description).await
    }

    /// Insert a product (its `id` field is ignored).
    pub async fn insert_product(&self, product: &Product) -> Result<Product, DivanoError> {
        queries::products::insert_product(self.db()?, product).await
    }

    /// Insert a delivery city.
    pub async fn insert_city(
        &self,
        name: &str,
        region: Option<&str>,
    ) -> Result<City, DivanoError> {
        queries::cities::insert_city(self.db()?, name, region).await
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, DivanoError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), DivanoError> {
        if let Some(db) = self.db.get() {
            db.close().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogStore for SqliteStorage {
    async fn initialize(&self) -> Result<(), DivanoError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| DivanoError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), DivanoError> {
        self.db()?.close().await
    }

    // --- Users ---

    async fn user_by_telegram_id(
        &self,
        telegram_id: &str,
    ) -> Result<Option<User>, DivanoError> {
        queries::users::user_by_telegram_id(self.db()?, telegram_id).await
    }

    async fn user_by_id(&self, id: i64) -> Result<Option<User>, DivanoError> {
        queries::users::user_by_id(self.db()?, id).await
    }

    async fn create_user(
        &self,
        profile: &UserProfile,
        now: DateTime<Utc>,
    ) -> Result<User, DivanoError> {
        queries::users::create_user(self.db()?, profile, now).await
    }

    async fn update_user_profile(&self, user: &User) -> Result<(), DivanoError> {
        queries::users::update_user_profile(self.db()?, user).await
    }

    async fn set_subscription_state(
        &self,
        user_id: i64,
        status: SubscriptionStatus,
        expiry: Option<DateTime<Utc>>,
    ) -> Result<(), DivanoError> {
        queries::users::set_subscription_state(self.db()?, user_id, status, expiry).await
    }

    // --- Subscriptions ---

    async fn current_subscription(
        &self,
        user_id: i64,
        now: DateTime<Utc>,
    ) -> Result<Option<Subscription>, DivanoError> {
        queries::subscriptions::current_subscription(self.db()?, user_id, now).await
    }

    async fn subscription_history(
        &self,
        user_id: i64,
    ) -> Result<Vec<Subscription>, DivanoError> {
        queries::subscriptions::subscription_history(self.db()?, user_id).await
    }

    async fn activate_subscription(
        &self,
        record: &NewSubscription,
    ) -> Result<Subscription, DivanoError> {
        queries::subscriptions::activate_subscription(self.db()?, record).await
    }

    async fn cancel_current_subscription(
        &self,
        user_id: i64,
        now: DateTime<Utc>,
    ) -> Result<bool, DivanoError> {
        queries::subscriptions::cancel_current_subscription(self.db()?, user_id, now).await
    }

    // --- Catalog ---

    async fn categories(&self) -> Result<Vec<Category>, DivanoError> {
        queries::categories::categories(self.db()?).await
    }

    async fn category_by_id(&self, id: i64) -> Result<Option<Category>, DivanoError> {
        queries::categories::category_by_id(self.db()?, id).await
    }

    async fn products_by_category(
        &self,
        category_id: i64,
    ) -> Result<Vec<Product>, DivanoError> {
        queries::products::products_by_category(self.db()?, category_id).await
    }

    async fn product_by_id(&self, id: i64) -> Result<Option<Product>, DivanoError> {
        queries::products::product_by_id(self.db()?, id).await
    }

    async fn product_by_code(&self, code: &str) -> Result<Option<Product>, DivanoError> {
        queries::products::product_by_code(self.db()?, code).await
    }

    async fn search_products(
        &self,
        filter: &ProductFilter,
    ) -> Result<Vec<Product>, DivanoError> {
        queries::products::search_products(self.db()?, filter).await
    }

    async fn distinct_manufacturers(&self) -> Result<Vec<String>, DivanoError> {
        queries::products::distinct_manufacturers(self.db()?).await
    }

    async fn distinct_product_cities(&self) -> Result<Vec<String>, DivanoError> {
        queries::products::distinct_product_cities(self.db()?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn make_config(path: &str) -> StorageConfig {
        StorageConfig {
            database_path: path.to_string(),
            wal_mode: true,
        }
    }

    #[tokio::test]
    async fn sqlite_storage_reports_adapter_metadata() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        assert_eq!(storage.name(), "sqlite");
        assert_eq!(storage.version(), semver::Version::new(0, 1, 0));
        assert_eq!(storage.adapter_type(), AdapterType::Storage);
    }

    #[tokio::test]
    async fn initialize_opens_database_at_configured_path() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("init_test.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        storage.initialize().await.unwrap();
        assert!(db_path.exists(), "database file should be created");
    }

    #[tokio::test]
    async fn initialize_twice_returns_error() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("double_init.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        storage.initialize().await.unwrap();
        assert!(storage.initialize().await.is_err());
    }

    #[tokio::test]
    async fn health_check_fails_when_not_initialized() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("no_init.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        assert!(storage.health_check().await.is_err());
    }

    #[tokio::test]
    async fn health_check_returns_healthy_when_initialized() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("health.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        storage.initialize().await.unwrap();
        assert_eq!(storage.health_check().await.unwrap(), HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn full_user_lifecycle_through_adapter() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("lifecycle.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));
        storage.initialize().await.unwrap();

        let now = Utc::now();
        let profile = UserProfile {
            telegram_id: "tg-adapter".into(),
            first_name: Some("Анна".into()),
            ..Default::default()
        };
        let user = storage.create_user(&profile, now).await.unwrap();

        let record = NewSubscription {
            user_id: user.id,
            status: SubscriptionStatus::Paid,
            period: Some(divano_core::SubscriptionPeriod::Month),
            start_date: now,
            end_date: now + chrono::Duration::days(30),
            payment_id: None,
            payment_amount: Some(500.0),
            payment_date: Some(now),
        };
        storage.activate_subscription(&record).await.unwrap();

        let current = storage.current_subscription(user.id, now).await.unwrap();
        assert!(current.is_some());

        assert!(storage.cancel_current_subscription(user.id, now).await.unwrap());
        let fetched = storage.user_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(fetched.subscription_status, SubscriptionStatus::Expired);

        storage.close().await.unwrap();
    }

    #[tokio::test]
    async fn catalog_seed_and_query_through_adapter() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("catalog.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));
        storage.initialize().await.unwrap();

        let category = storage.insert_category("Кровати", None).await.unwrap();
        let now = Utc::now();
        let product = Product {
            id: 0,
            product_code: "K-1".into(),
            category_id: category.id,
            name: "Кровать Соня".into(),
            description: None,
            price: 25000.0,
            manufacturer: Some("СонМебель".into()),
            size: Some("160x200".into()),
            city: Some("Пенза".into()),
            form: None,
            mechanism: None,
            filling: None,
            lifting_mechanism: Some(true),
            has_box: None,
            image_path: None,
            created_at: now,
            updated_at: now,
        };
        storage.insert_product(&product).await.unwrap();

        let products = storage.products_by_category(category.id).await.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].lifting_mechanism, Some(true));

        let filter = ProductFilter {
            city: Some("Пенза".into()),
            ..Default::default()
        };
        let found = storage.search_products(&filter).await.unwrap();
        assert_eq!(found.len(), 1);

        storage.shutdown().await.unwrap();
    }
}
