// SPDX-FileCopyrightText: 2026 Divano Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the catalog query service over real SQLite.

use std::sync::Arc;

use chrono::Utc;
use divano_catalog::CatalogService;
use divano_config::StorageConfig;
use divano_core::{CatalogStore, DivanoError, Product, SearchKind};
use divano_storage::SqliteStorage;
use tempfile::TempDir;

async fn service() -> (CatalogService, Arc<SqliteStorage>, TempDir) {
    let dir = TempDir::new().unwrap();
    let config = StorageConfig {
        database_path: dir.path().join("catalog.db").to_str().unwrap().to_string(),
        wal_mode: true,
    };
    let storage = Arc::new(SqliteStorage::new(config));
    storage.initialize().await.unwrap();
    (CatalogService::new(storage.clone()), storage, dir)
}

fn product(code: &str, category_id: i64, name: &str, price: f64) -> Product {
    let now = Utc::now();
    Product {
        id: 0,
        product_code: code.into(),
        category_id,
        name: name.into(),
        description: None,
        price,
        manufacturer: None,
        size: None,
        city: None,
        form: None,
        mechanism: None,
        filling: None,
        lifting_mechanism: None,
        has_box: None,
        image_path: None,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn category_cache_is_read_through() {
    let (service, storage, _dir) = service().await;
    storage.insert_category("Диваны", None).await.unwrap();

    let first = service.categories().await.unwrap();
    assert_eq!(first.len(), 1);

    // A row added behind the cache is invisible until refresh.
    storage.insert_category("Кровати", None).await.unwrap();
    let cached = service.categories().await.unwrap();
    assert_eq!(cached.len(), 1);

    service.refresh_categories().await;
    let fresh = service.categories().await.unwrap();
    assert_eq!(fresh.len(), 2);
}

#[tokio::test]
async fn quick_search_by_price_respects_ceiling_and_order() {
    let (service, storage, _dir) = service().await;
    let category = storage.insert_category("Диваны", None).await.unwrap();
    storage
        .insert_product(&product("D-1", category.id, "Диван Дорогой", 40000.0))
        .await
        .unwrap();
    storage
        .insert_product(&product("D-2", category.id, "Диван Средний", 18000.0))
        .await
        .unwrap();
    storage
        .insert_product(&product("D-3", category.id, "Диван Дешёвый", 7000.0))
        .await
        .unwrap();

    let results = service.quick_search(SearchKind::Price, "20000").await.unwrap();
    let prices: Vec<f64> = results.iter().map(|p| p.price).collect();
    assert_eq!(prices, vec![7000.0, 18000.0]);

    let all = service.quick_search(SearchKind::Price, "any").await.unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].price, 7000.0);
}

#[tokio::test]
async fn quick_search_rejects_bad_input() {
    let (service, _storage, _dir) = service().await;

    let err = service
        .quick_search(SearchKind::Price, "дорого")
        .await
        .unwrap_err();
    assert!(matches!(err, DivanoError::InvalidInput(_)));

    let err = service.quick_search(SearchKind::Name, "   ").await.unwrap_err();
    assert!(matches!(err, DivanoError::InvalidInput(_)));
}

#[tokio::test]
async fn quick_search_by_name_and_code() {
    let (service, storage, _dir) = service().await;
    let category = storage.insert_category("Кресла", None).await.unwrap();
    storage
        .insert_product(&product("KR-7", category.id, "Кресло Бриз", 12000.0))
        .await
        .unwrap();

    let by_name = service.quick_search(SearchKind::Name, "Бриз").await.unwrap();
    assert_eq!(by_name.len(), 1);

    let by_code = service.quick_search(SearchKind::Code, "KR").await.unwrap();
    assert_eq!(by_code.len(), 1);

    let none = service.quick_search(SearchKind::Name, "Стол").await.unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn advanced_search_combines_category_and_attributes() {
    let (service, storage, _dir) = service().await;
    let sofas = storage.insert_category("Диваны", None).await.unwrap();
    let beds = storage.insert_category("Кровати", None).await.unwrap();

    let mut corner = product("D-1", sofas.id, "Диван Угловой", 20000.0);
    corner.form = Some("угловой".into());
    corner.mechanism = Some("дельфин".into());
    storage.insert_product(&corner).await.unwrap();

    let mut straight = product("D-2", sofas.id, "Диван Прямой", 15000.0);
    straight.form = Some("прямой".into());
    storage.insert_product(&straight).await.unwrap();

    let mut bed = product("K-1", beds.id, "Кровать Подъёмная", 25000.0);
    bed.lifting_mechanism = Some(true);
    storage.insert_product(&bed).await.unwrap();

    let filter = divano_core::ProductFilter {
        category_id: Some(sofas.id),
        form: Some("угловой".into()),
        ..Default::default()
    };
    let found = service.advanced_search(&filter).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].product_code, "D-1");

    let filter = divano_core::ProductFilter {
        lifting_mechanism: Some(true),
        ..Default::default()
    };
    let found = service.advanced_search(&filter).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].product_code, "K-1");

    let filter = divano_core::ProductFilter {
        category_id: Some(sofas.id),
        max_price: Some(16000.0),
        ..Default::default()
    };
    let found = service.advanced_search(&filter).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].product_code, "D-2");
}

#[tokio::test]
async fn product_lookups_pass_through() {
    let (service, storage, _dir) = service().await;
    let category = storage.insert_category("Пуфы", None).await.unwrap();
    let seeded = storage
        .insert_product(&product("P-1", category.id, "Пуф Кроха", 3000.0))
        .await
        .unwrap();

    assert_eq!(
        service.product_by_id(seeded.id).await.unwrap().unwrap().name,
        "Пуф Кроха"
    );
    assert_eq!(
        service.product_by_code("P-1").await.unwrap().unwrap().id,
        seeded.id
    );
    assert!(service.product_by_id(999).await.unwrap().is_none());

    // Empty category still yields an empty list.
    let empty = storage.insert_category("Аксессуары", None).await.unwrap();
    assert!(service.products_by_category(empty.id).await.unwrap().is_empty());
}
