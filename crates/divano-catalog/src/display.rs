// SPDX-FileCopyrightText: 2026 Divano Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Display formatting for catalog entities.
//!
//! Category-specific attributes render only for the matching category kind,
//! keyed on the category name: seating gets form/mechanism/filling, beds
//! get the lifting mechanism flag, ottomans get the storage box flag.

use divano_core::Product;

/// Emoji shown next to a category button.
pub fn category_emoji(category_name: &str) -> &'static str {
    match category_name {
        "Диваны" => "🛋️",
        "Кресла" => "💺",
        "Пуфы" => "🪑",
        "Кровати" => "🛏️",
        "Аксессуары" => "🧸",
        _ => "📦",
    }
}

/// Product button label: name plus whole-currency price.
pub fn product_label(product: &Product) -> String {
    format!("{} {}р.", product.name, product.price as i64)
}

fn yes_no(flag: Option<bool>) -> &'static str {
    if flag.unwrap_or(false) {
        "Есть"
    } else {
        "Нет"
    }
}

/// Full detail text for a product, with category-specific attributes.
pub fn product_detail_text(product: &Product, category_name: &str) -> String {
    let mut text = format!(
        "🛋️ *{}*\n\n\
         Код товара: {}\n\
         Категория: {}\n\
         Производитель: {}\n\
         Размер: {}\n\
         Город: {}\n\n",
        product_label(product),
        product.product_code,
        category_name,
        product.manufacturer.as_deref().unwrap_or("Не указан"),
        product.size.as_deref().unwrap_or("Не указан"),
        product.city.as_deref().unwrap_or("Не указан"),
    );

    let kind = category_name.to_lowercase();
    if kind.contains("диван") {
        text.push_str(&format!(
            "Форма: {}\nМеханизм разложения: {}\nНаполнение: {}\n\n",
            product.form.as_deref().unwrap_or("Не указана"),
            product.mechanism.as_deref().unwrap_or("Не указан"),
            product.filling.as_deref().unwrap_or("Не указано"),
        ));
    } else if kind.contains("кровать") {
        text.push_str(&format!(
            "Подъемный механизм: {}\n\n",
            yes_no(product.lifting_mechanism)
        ));
    } else if kind.contains("пуф") {
        text.push_str(&format!("Ящик: {}\n\n", yes_no(product.has_box)));
    }

    text.push_str(&format!(
        "Описание: {}",
        product.description.as_deref().unwrap_or("Отсутствует")
    ));
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(name: &str) -> Product {
        let now = Utc::now();
        Product {
            id: 1,
            product_code: "D-100".into(),
            category_id: 1,
            name: name.into(),
            description: Some("Удобный".into()),
            price: 15990.5,
            manufacturer: Some("Уют".into()),
            size: Some("200x90".into()),
            city: Some("Киров".into()),
            form: Some("угловой".into()),
            mechanism: Some("еврокнижка".into()),
            filling: Some("пенополиуретан".into()),
            lifting_mechanism: Some(true),
            has_box: None,
            image_path: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn label_truncates_price_to_whole_currency() {
        assert_eq!(product_label(&product("Диван Мечта")), "Диван Мечта 15990р.");
    }

    #[test]
    fn seating_detail_includes_form_mechanism_filling() {
        let text = product_detail_text(&product("Диван Мечта"), "Диваны");
        assert!(text.contains("Форма: угловой"));
        assert!(text.contains("Механизм разложения: еврокнижка"));
        assert!(text.contains("Наполнение: пенополиуретан"));
        assert!(!text.contains("Подъемный механизм"));
        assert!(!text.contains("Ящик:"));
    }

    #[test]
    fn bed_detail_includes_only_lifting_mechanism() {
        let text = product_detail_text(&product("Кровать Соня"), "Кровати");
        assert!(text.contains("Подъемный механизм: Есть"));
        assert!(!text.contains("Форма:"));
        assert!(!text.contains("Ящик:"));
    }

    #[test]
    fn ottoman_detail_includes_only_box_flag() {
        let text = product_detail_text(&product("Пуф Кроха"), "Пуфы");
        assert!(text.contains("Ящик: Нет"));
        assert!(!text.contains("Форма:"));
        assert!(!text.contains("Подъемный механизм"));
    }

    #[test]
    fn other_category_gets_no_specific_attributes() {
        let text = product_detail_text(&product("Кресло Бриз"), "Кресла");
        assert!(!text.contains("Форма:"));
        assert!(!text.contains("Подъемный механизм"));
        assert!(!text.contains("Ящик:"));
        assert!(text.contains("Описание: Удобный"));
    }

    #[test]
    fn unknown_category_emoji_falls_back_to_box() {
        assert_eq!(category_emoji("Диваны"), "🛋️");
        assert_eq!(category_emoji("Шкафы"), "📦");
    }

    #[test]
    fn missing_fields_render_placeholders() {
        let mut p = product("Диван Пустой");
        p.manufacturer = None;
        p.description = None;
        let text = product_detail_text(&p, "Диваны");
        assert!(text.contains("Производитель: Не указан"));
        assert!(text.contains("Описание: Отсутствует"));
    }
}
