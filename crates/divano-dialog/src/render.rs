// SPDX-FileCopyrightText: 2026 Divano Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Screen rendering: texts and inline keyboards.
//!
//! Pure functions from data to [`ScreenView`]; all store access happens in
//! the navigator before rendering.

use chrono::{DateTime, Utc};
use divano_auth::SubscriptionInfo;
use divano_catalog::display;
use divano_core::{
    Button, Category, Product, ScreenView, SearchKind, SubscriptionPeriod, SubscriptionStatus,
    User,
};

fn menu_button() -> Vec<Button> {
    vec![Button::new("🏠 Главное меню", "back_to_menu")]
}

fn date(d: DateTime<Utc>) -> String {
    d.format("%d.%m.%Y").to_string()
}

/// Greeting shown while awaiting the authorization code.
pub fn auth_prompt(first_name: Option<&str>) -> ScreenView {
    let name = first_name.unwrap_or("гость");
    ScreenView {
        text: format!(
            "👋 Здравствуйте, {name}!\n\n\
             Для доступа к каталогу мебели необходимо ввести код авторизации.\n\
             Пожалуйста, введите ваш код:"
        ),
        keyboard: vec![],
        image: None,
    }
}

/// Retry prompt after a failed code submission.
pub fn auth_retry(message: &str) -> ScreenView {
    ScreenView {
        text: format!("{message}\n\nПожалуйста, попробуйте еще раз или обратитесь к администратору."),
        keyboard: vec![],
        image: None,
    }
}

/// The main menu, optionally prefixed with a transient notice (e.g. a
/// successful code activation).
pub fn main_menu(notice: Option<&str>) -> ScreenView {
    let mut text = String::new();
    if let Some(notice) = notice {
        text.push_str(notice);
        text.push_str("\n\n");
    }
    text.push_str("🏠 Главное меню\n\nВыберите раздел:");
    ScreenView {
        text,
        keyboard: vec![
            vec![Button::new("🛋️ Каталог мебели", "catalog")],
            vec![Button::new("🔍 Поиск", "search")],
            vec![Button::new("👑 Подписка", "subscription")],
            vec![Button::new("ℹ️ О боте", "about")],
            vec![Button::new("👤 Мой профиль", "profile")],
        ],
        image: None,
    }
}

/// Warning shown when a gated flow is entered without active access.
pub fn no_access() -> ScreenView {
    ScreenView {
        text: "⚠️ У вас нет активной подписки.\n\n\
               Для доступа к каталогу мебели необходимо ввести код авторизации.\n\
               Пожалуйста, используйте команду /start для авторизации."
            .to_string(),
        keyboard: vec![menu_button()],
        image: None,
    }
}

/// Static bot description.
pub fn about() -> ScreenView {
    ScreenView {
        text: "ℹ️ *О боте*\n\n\
               Этот бот предоставляет доступ к каталогу мебели.\n\n\
               *Основные функции:*\n\
               • Просмотр каталога мебели по категориям\n\
               • Поиск товаров по различным параметрам\n\
               • Просмотр детальной информации о товарах\n\
               • Управление подпиской\n\n\
               *Команды:*\n\
               /start - Начать работу с ботом\n\
               /catalog - Открыть каталог мебели\n\
               /search - Поиск товаров\n\
               /subscription - Управление подпиской\n\
               /profile - Просмотр профиля\n\
               /about - Информация о боте\n\n\
               Для доступа к полному каталогу необходима активная подписка."
            .to_string(),
        keyboard: vec![menu_button()],
        image: None,
    }
}

/// User profile with subscription state.
pub fn profile(user: &User) -> ScreenView {
    let status = if user.subscription_status == SubscriptionStatus::Paid {
        "Активна"
    } else {
        "Не активна"
    };
    let expiry = user
        .subscription_expiry
        .map(date)
        .unwrap_or_else(|| "Нет".to_string());
    ScreenView {
        text: format!(
            "👤 *Профиль пользователя*\n\n\
             *Имя:* {}\n\
             *Фамилия:* {}\n\
             *Username:* @{}\n\n\
             *Статус подписки:* {status}\n\
             *Действует до:* {expiry}\n\n\
             *Дата регистрации:* {}",
            user.first_name.as_deref().unwrap_or("Не указано"),
            user.last_name.as_deref().unwrap_or("Не указана"),
            user.username.as_deref().unwrap_or("Не указан"),
            date(user.registration_date),
        ),
        keyboard: vec![menu_button()],
        image: None,
    }
}

/// Category chooser.
pub fn catalog_categories(categories: &[Category]) -> ScreenView {
    let mut keyboard: Vec<Vec<Button>> = categories
        .iter()
        .map(|c| {
            vec![Button::new(
                format!("{} {}", display::category_emoji(&c.name), c.name),
                format!("category_{}", c.id),
            )]
        })
        .collect();
    keyboard.push(menu_button());
    ScreenView {
        text: "🛋️ *Каталог мебели*\n\nВыберите категорию:".to_string(),
        keyboard,
        image: None,
    }
}

/// Actions for a selected category.
pub fn category_actions(category: &Category) -> ScreenView {
    ScreenView {
        text: format!(
            "{} *{}*\n\n{}",
            display::category_emoji(&category.name),
            category.name,
            category.description.as_deref().unwrap_or("Выберите действие:"),
        ),
        keyboard: vec![
            vec![Button::new(
                "📋 Показать все товары",
                format!("show_all_{}", category.id),
            )],
            vec![Button::new(
                "🔍 Поиск в этой категории",
                format!("search_in_{}", category.id),
            )],
            vec![Button::new("⬅️ Назад к категориям", "catalog")],
            menu_button(),
        ],
        image: None,
    }
}

/// Missing category fallback.
pub fn category_not_found() -> ScreenView {
    ScreenView {
        text: "❌ Категория не найдена.\n\n\
               Пожалуйста, выберите другую категорию или вернитесь в главное меню."
            .to_string(),
        keyboard: vec![
            vec![Button::new("⬅️ Назад к категориям", "catalog")],
            menu_button(),
        ],
        image: None,
    }
}

/// Products of a category, one button per product (already price-sorted).
pub fn product_list(category: &Category, products: &[Product]) -> ScreenView {
    let mut keyboard: Vec<Vec<Button>> = products
        .iter()
        .map(|p| {
            vec![Button::new(
                display::product_label(p),
                format!("product_{}", p.id),
            )]
        })
        .collect();
    keyboard.push(vec![Button::new(
        "⬅️ Назад к категории",
        format!("category_{}", category.id),
    )]);
    keyboard.push(menu_button());
    ScreenView {
        text: format!(
            "{} *{}*\n\n\
             Найдено товаров: {}\n\n\
             Выберите товар для просмотра подробной информации:",
            display::category_emoji(&category.name),
            category.name,
            products.len(),
        ),
        keyboard,
        image: None,
    }
}

/// Missing product fallback.
pub fn product_not_found() -> ScreenView {
    ScreenView {
        text: "❌ Товар не найден.\n\n\
               Пожалуйста, выберите другой товар или вернитесь в каталог."
            .to_string(),
        keyboard: vec![
            vec![Button::new("⬅️ Назад к каталогу", "catalog")],
            menu_button(),
        ],
        image: None,
    }
}

/// Full product detail; `back` is the origin-specific back button.
pub fn product_detail(product: &Product, category_name: &str, back: Button) -> ScreenView {
    ScreenView {
        text: display::product_detail_text(product, category_name),
        keyboard: vec![vec![back], menu_button()],
        image: product.image_path.clone(),
    }
}

/// Search dimension chooser.
pub fn search_menu() -> ScreenView {
    ScreenView {
        text: "🔍 *Поиск мебели*\n\nВыберите тип поиска:".to_string(),
        keyboard: vec![
            vec![Button::new("💰 По цене", "quick_search_price")],
            vec![Button::new("🏭 По производителю", "quick_search_manufacturer")],
            vec![Button::new("🏙️ По городу", "quick_search_city")],
            vec![Button::new("📝 По названию", "quick_search_name")],
            vec![Button::new("🔢 По коду товара", "quick_search_code")],
            menu_button(),
        ],
        image: None,
    }
}

const PRICE_CEILINGS: [i64; 5] = [5000, 10000, 20000, 30000, 50000];

/// Fixed price ceilings.
pub fn price_choice() -> ScreenView {
    let mut keyboard: Vec<Vec<Button>> = PRICE_CEILINGS
        .iter()
        .map(|p| {
            vec![Button::new(
                format!("До {p} ₽"),
                format!("price_{p}"),
            )]
        })
        .collect();
    keyboard.push(vec![Button::new("Любая цена", "price_any")]);
    keyboard.push(vec![Button::new("⬅️ Назад к поиску", "search")]);
    keyboard.push(menu_button());
    ScreenView {
        text: "💰 *Поиск по цене*\n\nВыберите максимальную цену:".to_string(),
        keyboard,
        image: None,
    }
}

/// Value chooser for manufacturer/city quick search.
pub fn value_choice(kind: SearchKind, values: &[String]) -> ScreenView {
    let (title, prefix) = match kind {
        SearchKind::Manufacturer => {
            ("🏭 *Поиск по производителю*\n\nВыберите производителя:", "manufacturer_")
        }
        _ => ("🏙️ *Поиск по городу*\n\nВыберите город:", "city_"),
    };
    let mut keyboard: Vec<Vec<Button>> = values
        .iter()
        .map(|v| vec![Button::new(v.clone(), format!("{prefix}{v}"))])
        .collect();
    keyboard.push(vec![Button::new("⬅️ Назад к поиску", "search")]);
    keyboard.push(menu_button());
    ScreenView {
        text: title.to_string(),
        keyboard,
        image: None,
    }
}

/// Free-text prompt for name/code quick search.
pub fn value_input(kind: SearchKind) -> ScreenView {
    let text = match kind {
        SearchKind::Code => {
            "🔢 *Поиск по коду товара*\n\nВведите код товара или его часть:"
        }
        _ => "📝 *Поиск по названию*\n\nВведите название или часть названия товара:",
    };
    ScreenView {
        text: text.to_string(),
        keyboard: vec![vec![Button::new("⬅️ Назад к поиску", "search")]],
        image: None,
    }
}

/// Search results, one button per product (already price-sorted).
pub fn search_results(products: &[Product]) -> ScreenView {
    let mut keyboard: Vec<Vec<Button>> = products
        .iter()
        .map(|p| {
            vec![Button::new(
                display::product_label(p),
                format!("product_{}", p.id),
            )]
        })
        .collect();
    keyboard.push(vec![Button::new("⬅️ Назад к поиску", "search")]);
    keyboard.push(menu_button());
    let text = if products.is_empty() {
        "🔍 *Результаты поиска*\n\nНичего не найдено. Попробуйте изменить запрос.".to_string()
    } else {
        format!(
            "🔍 *Результаты поиска*\n\n\
             Найдено товаров: {}\n\n\
             Выберите товар для просмотра подробной информации:",
            products.len()
        )
    };
    ScreenView {
        text,
        keyboard,
        image: None,
    }
}

/// Rejected search value (unparseable price, empty input).
pub fn invalid_search_value() -> ScreenView {
    ScreenView {
        text: "❌ Не удалось разобрать значение для поиска.\n\nПожалуйста, введите его еще раз:"
            .to_string(),
        keyboard: vec![vec![Button::new("⬅️ Назад к поиску", "search")]],
        image: None,
    }
}

/// Subscription menu: active summary with renewal offers, or purchase offers.
pub fn subscription_menu(
    info: &SubscriptionInfo,
    month_price: f64,
    year_price: f64,
) -> ScreenView {
    match info {
        SubscriptionInfo::Active {
            end_date, days_left, ..
        } => ScreenView {
            text: format!(
                "👑 *Ваша подписка*\n\n\
                 Статус: Активна\n\
                 Действует до: {}\n\
                 Осталось дней: {days_left}\n\n\
                 Хотите продлить подписку?",
                date(*end_date),
            ),
            keyboard: vec![
                vec![Button::new("📅 Продлить на месяц", "subscribe_month")],
                vec![Button::new("📆 Продлить на год", "subscribe_year")],
                vec![Button::new("❌ Отменить подписку", "cancel_subscription")],
                menu_button(),
            ],
            image: None,
        },
        _ => ScreenView {
            text: "🔒 *Подписка*\n\n\
                   У вас нет активной подписки.\n\n\
                   Выберите тип подписки:"
                .to_string(),
            keyboard: vec![
                vec![Button::new(
                    format!("📅 Подписка на месяц - {}₽", month_price as i64),
                    "subscribe_month",
                )],
                vec![Button::new(
                    format!("📆 Подписка на год - {}₽", year_price as i64),
                    "subscribe_year",
                )],
                menu_button(),
            ],
            image: None,
        },
    }
}

fn period_label(period: SubscriptionPeriod) -> &'static str {
    match period {
        SubscriptionPeriod::Month => "1 месяц",
        SubscriptionPeriod::Year => "1 год",
        SubscriptionPeriod::Forever => "навсегда",
    }
}

/// Payment method chooser for the selected period.
pub fn payment_method_choice(period: SubscriptionPeriod, price: f64) -> ScreenView {
    ScreenView {
        text: format!(
            "💳 *Оплата подписки*\n\n\
             Тип подписки: {}\n\
             Стоимость: {}₽\n\n\
             Для оплаты выберите способ:",
            period_label(period),
            price as i64,
        ),
        keyboard: vec![
            vec![Button::new("💳 Банковская карта", "payment_card")],
            vec![Button::new("🏦 СБП", "payment_sbp")],
            vec![Button::new("🔙 Назад", "subscription")],
            menu_button(),
        ],
        image: None,
    }
}

/// Simulated payment success, awaiting explicit activation.
pub fn payment_pending() -> ScreenView {
    ScreenView {
        text: "✅ *Оплата успешно выполнена!*\n\n\
               Для активации подписки нажмите кнопку ниже:"
            .to_string(),
        keyboard: vec![
            vec![Button::new("✅ Подтвердить активацию", "payment_confirmed")],
            menu_button(),
        ],
        image: None,
    }
}

/// Activation confirmation after a completed purchase.
pub fn payment_confirmed(period: SubscriptionPeriod, end_date: DateTime<Utc>) -> ScreenView {
    ScreenView {
        text: format!(
            "🎉 *Подписка успешно активирована!*\n\n\
             Тип подписки: {}\n\
             Действует до: {}\n\n\
             Теперь вам доступен полный каталог мебели. Приятного использования!",
            period_label(period),
            date(end_date),
        ),
        keyboard: vec![
            vec![Button::new("🛋️ Перейти в каталог", "catalog")],
            menu_button(),
        ],
        image: None,
    }
}

/// Cancellation confirmation request.
pub fn cancel_confirm() -> ScreenView {
    ScreenView {
        text: "⚠️ *Отмена подписки*\n\n\
               Вы уверены, что хотите отменить подписку?\n\
               После отмены вы потеряете доступ к каталогу мебели."
            .to_string(),
        keyboard: vec![
            vec![Button::new("✅ Да, отменить", "confirm_cancel")],
            vec![Button::new("❌ Нет, вернуться", "subscription")],
        ],
        image: None,
    }
}

/// Result of a cancellation attempt.
pub fn cancel_result(success: bool) -> ScreenView {
    let text = if success {
        "✅ Ваша подписка успешно отменена.\n\n\
         Вы можете оформить новую подписку в любое время через меню подписки."
    } else {
        "❌ Ошибка при отмене подписки.\n\n\
         Возможно, у вас нет активной подписки или произошла ошибка базы данных."
    };
    ScreenView {
        text: text.to_string(),
        keyboard: vec![menu_button()],
        image: None,
    }
}

/// Generic persistence failure; the in-flight write was rolled back.
pub fn store_failure() -> ScreenView {
    ScreenView {
        text: "❌ Произошла ошибка. Пожалуйста, попробуйте еще раз позже.".to_string(),
        keyboard: vec![menu_button()],
        image: None,
    }
}
