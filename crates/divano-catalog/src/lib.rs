// SPDX-FileCopyrightText: 2026 Divano Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Catalog query service: read-only projections and attribute filters over
//! the store, plus display formatting for product summaries and detail
//! views.
//!
//! The category list is served through an explicit read-through cache owned
//! by this service; everything else goes straight to the store.

pub mod display;

use std::sync::Arc;
use std::time::Duration;

use divano_core::{
    CatalogStore, Category, DivanoError, Product, ProductFilter, SearchKind,
};
use moka::future::Cache;
use tracing::debug;

/// How long a cached category list stays fresh. Categories change only
/// through the out-of-band catalog tooling, so staleness up to this bound
/// is acceptable.
const CATEGORY_CACHE_TTL: Duration = Duration::from_secs(60);

/// Read-only catalog queries with a category cache.
///
/// Cheap to clone.
#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn CatalogStore>,
    categories: Cache<(), Arc<Vec<Category>>>,
}

impl CatalogService {
    /// Creates the service over a store.
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self {
            store,
            categories: Cache::builder()
                .max_capacity(1)
                .time_to_live(CATEGORY_CACHE_TTL)
                .build(),
        }
    }

    /// All categories, read through the cache.
    pub async fn categories(&self) -> Result<Arc<Vec<Category>>, DivanoError> {
        if let Some(cached) = self.categories.get(&()).await {
            return Ok(cached);
        }
        let fresh = Arc::new(self.store.categories().await?);
        self.categories.insert((), fresh.clone()).await;
        debug!(count = fresh.len(), "category cache refilled");
        Ok(fresh)
    }

    /// Drops the cached category list; the next read refills it.
    pub async fn refresh_categories(&self) {
        self.categories.invalidate(&()).await;
    }

    /// A category by primary key (uncached, always current).
    pub async fn category_by_id(&self, id: i64) -> Result<Option<Category>, DivanoError> {
        self.store.category_by_id(id).await
    }

    /// Products in a category, cheapest first. An empty category yields an
    /// empty list, not an error.
    pub async fn products_by_category(
        &self,
        category_id: i64,
    ) -> Result<Vec<Product>, DivanoError> {
        self.store.products_by_category(category_id).await
    }

    /// A product by primary key.
    pub async fn product_by_id(&self, id: i64) -> Result<Option<Product>, DivanoError> {
        self.store.product_by_id(id).await
    }

    /// A product by its unique code.
    pub async fn product_by_code(&self, code: &str) -> Result<Option<Product>, DivanoError> {
        self.store.product_by_code(code).await
    }

    /// Distinct manufacturers across all products, for the search keyboard.
    pub async fn manufacturers(&self) -> Result<Vec<String>, DivanoError> {
        self.store.distinct_manufacturers().await
    }

    /// Distinct cities across all products, for the search keyboard.
    pub async fn product_cities(&self) -> Result<Vec<String>, DivanoError> {
        self.store.distinct_product_cities().await
    }

    /// One-dimension quick search, cheapest first.
    ///
    /// For [`SearchKind::Price`] the value is a maximum price, or `any` for
    /// no ceiling; an unparseable price is an [`DivanoError::InvalidInput`].
    /// Text kinds match case-insensitive substrings.
    pub async fn quick_search(
        &self,
        kind: SearchKind,
        value: &str,
    ) -> Result<Vec<Product>, DivanoError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(DivanoError::InvalidInput("empty search value".into()));
        }

        let mut filter = ProductFilter::default();
        match kind {
            SearchKind::Price => {
                if value != "any" {
                    let max = value.parse::<f64>().map_err(|_| {
                        DivanoError::InvalidInput(format!("unparseable price `{value}`"))
                    })?;
                    filter.max_price = Some(max);
                }
            }
            SearchKind::Manufacturer => filter.manufacturer = Some(value.to_string()),
            SearchKind::City => filter.city = Some(value.to_string()),
            SearchKind::Name => filter.name = Some(value.to_string()),
            SearchKind::Code => filter.code = Some(value.to_string()),
        }
        self.store.search_products(&filter).await
    }

    /// Multi-attribute search, cheapest first.
    pub async fn advanced_search(
        &self,
        filter: &ProductFilter,
    ) -> Result<Vec<Product>, DivanoError> {
        self.store.search_products(filter).await
    }
}
