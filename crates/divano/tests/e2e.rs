// SPDX-FileCopyrightText: 2026 Divano Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end scenario against the real navigator and SQLite store, with
//! the transport layer left out.

use std::sync::Arc;

use chrono::{Duration, Utc};
use divano_auth::AccountService;
use divano_catalog::CatalogService;
use divano_config::{AuthConfig, PricingConfig, StorageConfig};
use divano_core::{
    ActionKind, CatalogStore, InboundEvent, Product, SubscriptionStatus, UserProfile,
};
use divano_dialog::{Navigator, Screen};
use divano_storage::SqliteStorage;
use tempfile::TempDir;

fn event(action: ActionKind) -> InboundEvent {
    InboundEvent {
        conversation_id: "100500".into(),
        profile: UserProfile {
            telegram_id: "100500".into(),
            username: Some("pokupatel".into()),
            first_name: Some("Ольга".into()),
            ..Default::default()
        },
        action,
        message_id: None,
    }
}

async fn seed(storage: &SqliteStorage) {
    let sofas = storage
        .insert_category("Диваны", Some("Мягкая мебель для гостиной"))
        .await
        .unwrap();
    let beds = storage.insert_category("Кровати", None).await.unwrap();

    let now = Utc::now();
    let base = Product {
        id: 0,
        product_code: String::new(),
        category_id: sofas.id,
        name: String::new(),
        description: None,
        price: 0.0,
        manufacturer: Some("МебельПлюс".into()),
        size: None,
        city: Some("Москва".into()),
        form: None,
        mechanism: None,
        filling: None,
        lifting_mechanism: None,
        has_box: None,
        image_path: None,
        created_at: now,
        updated_at: now,
    };

    let mut sofa_costly = base.clone();
    sofa_costly.product_code = "DV-2".into();
    sofa_costly.name = "Диван Премиум".into();
    sofa_costly.price = 45000.0;
    sofa_costly.form = Some("угловой".into());
    sofa_costly.mechanism = Some("дельфин".into());
    sofa_costly.filling = Some("латекс".into());
    storage.insert_product(&sofa_costly).await.unwrap();

    let mut sofa_cheap = base.clone();
    sofa_cheap.product_code = "DV-1".into();
    sofa_cheap.name = "Диван Старт".into();
    sofa_cheap.price = 12000.0;
    sofa_cheap.form = Some("прямой".into());
    sofa_cheap.mechanism = Some("еврокнижка".into());
    sofa_cheap.filling = Some("пенополиуретан".into());
    storage.insert_product(&sofa_cheap).await.unwrap();

    let mut bed = base.clone();
    bed.category_id = beds.id;
    bed.product_code = "KR-1".into();
    bed.name = "Кровать Люкс".into();
    bed.price = 30000.0;
    bed.lifting_mechanism = Some(true);
    storage.insert_product(&bed).await.unwrap();
}

#[tokio::test]
async fn full_user_journey_from_code_gate_to_product_detail() {
    let dir = TempDir::new().unwrap();
    let storage = Arc::new(SqliteStorage::new(StorageConfig {
        database_path: dir.path().join("e2e.db").to_str().unwrap().to_string(),
        wal_mode: true,
    }));
    storage.initialize().await.unwrap();
    seed(&storage).await;

    let store: Arc<dyn CatalogStore> = storage.clone();
    let navigator = Navigator::new(
        AccountService::new(store.clone(), AuthConfig::default(), PricingConfig::default()),
        CatalogService::new(store),
    );

    // New user arrives: code gate.
    let view = navigator
        .handle_event(&event(ActionKind::Command("start".into())))
        .await;
    assert!(view.text.contains("Здравствуйте, Ольга"));
    assert_eq!(
        navigator.current_screen("100500"),
        Some(Screen::AwaitingAuthCode)
    );

    // Correct code: PAID with expiry 30 days out, straight to the menu.
    let before = Utc::now();
    let view = navigator
        .handle_event(&event(ActionKind::Text("M1234".into())))
        .await;
    assert!(view.text.contains("Код активирован"));
    assert!(view.text.contains("Главное меню"));

    let user = storage.user_by_telegram_id("100500").await.unwrap().unwrap();
    assert_eq!(user.subscription_status, SubscriptionStatus::Paid);
    let expiry = user.subscription_expiry.unwrap();
    assert!(expiry >= before + Duration::days(30));
    assert!(expiry <= Utc::now() + Duration::days(30));

    // Catalog: both categories offered.
    let view = navigator
        .handle_event(&event(ActionKind::Button("catalog".into())))
        .await;
    let category_buttons: Vec<String> = view
        .keyboard
        .iter()
        .flatten()
        .filter(|b| b.data.starts_with("category_"))
        .map(|b| b.data.clone())
        .collect();
    assert_eq!(category_buttons.len(), 2);
    let sofas_button = view
        .keyboard
        .iter()
        .flatten()
        .find(|b| b.label.contains("Диваны"))
        .unwrap()
        .data
        .clone();

    // Into the sofa category, then its full product list.
    let view = navigator
        .handle_event(&event(ActionKind::Button(sofas_button.clone())))
        .await;
    assert!(view.text.contains("Мягкая мебель для гостиной"));
    let show_all = sofas_button.replace("category_", "show_all_");
    let view = navigator
        .handle_event(&event(ActionKind::Button(show_all)))
        .await;
    assert!(view.text.contains("Найдено товаров: 2"));

    // Price-ascending order.
    let product_labels: Vec<String> = view
        .keyboard
        .iter()
        .flatten()
        .filter(|b| b.data.starts_with("product_"))
        .map(|b| b.label.clone())
        .collect();
    assert_eq!(
        product_labels,
        vec!["Диван Старт 12000р.", "Диван Премиум 45000р."]
    );

    // Seating detail carries the seating-specific attributes.
    let cheap = view
        .keyboard
        .iter()
        .flatten()
        .find(|b| b.label.starts_with("Диван Старт"))
        .unwrap()
        .data
        .clone();
    let view = navigator.handle_event(&event(ActionKind::Button(cheap))).await;
    assert!(view.text.contains("Код товара: DV-1"));
    assert!(view.text.contains("Форма: прямой"));
    assert!(view.text.contains("Механизм разложения: еврокнижка"));
    assert!(view.text.contains("Наполнение: пенополиуретан"));
    assert!(!view.text.contains("Подъемный механизм"));
}

#[tokio::test]
async fn bed_detail_shows_lifting_mechanism_only() {
    let dir = TempDir::new().unwrap();
    let storage = Arc::new(SqliteStorage::new(StorageConfig {
        database_path: dir.path().join("e2e2.db").to_str().unwrap().to_string(),
        wal_mode: true,
    }));
    storage.initialize().await.unwrap();
    seed(&storage).await;

    let store: Arc<dyn CatalogStore> = storage.clone();
    let navigator = Navigator::new(
        AccountService::new(store.clone(), AuthConfig::default(), PricingConfig::default()),
        CatalogService::new(store),
    );

    navigator
        .handle_event(&event(ActionKind::Command("start".into())))
        .await;
    navigator
        .handle_event(&event(ActionKind::Text("M1234".into())))
        .await;

    // Find the bed through code search.
    navigator
        .handle_event(&event(ActionKind::Command("search".into())))
        .await;
    navigator
        .handle_event(&event(ActionKind::Button("quick_search_code".into())))
        .await;
    let view = navigator
        .handle_event(&event(ActionKind::Text("KR-1".into())))
        .await;
    assert!(view.text.contains("Найдено товаров: 1"));

    let bed = view
        .keyboard
        .iter()
        .flatten()
        .find(|b| b.data.starts_with("product_"))
        .unwrap()
        .data
        .clone();
    let view = navigator.handle_event(&event(ActionKind::Button(bed))).await;
    assert!(view.text.contains("Подъемный механизм: Есть"));
    assert!(!view.text.contains("Форма:"));
    assert!(!view.text.contains("Наполнение:"));
}
