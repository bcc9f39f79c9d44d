// SPDX-FileCopyrightText: 2026 Divano Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inbound action parsing.
//!
//! Callback payloads are short prefixed strings (`category_3`,
//! `subscribe_month`, `price_any`). Anything unrecognized parses to
//! [`Action::Unrecognized`], which every screen treats as a no-op.

use std::str::FromStr;

use divano_core::{ActionKind, PaymentMethod, SearchKind, SubscriptionPeriod};

/// A parsed inbound action.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Command(Command),
    Button(ButtonAction),
    Text(String),
    /// A command or button payload outside the recognized set.
    Unrecognized,
}

/// Slash commands understood by the bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Catalog,
    Search,
    Subscription,
    Profile,
    About,
    Cancel,
}

/// Recognized inline button payloads.
#[derive(Debug, Clone, PartialEq)]
pub enum ButtonAction {
    BackToMenu,
    Catalog,
    Search,
    About,
    Profile,
    Subscription,
    BackToResults,
    Category(i64),
    ShowAll(i64),
    SearchInCategory(i64),
    Product(i64),
    QuickSearch(SearchKind),
    /// Maximum price ceiling; `None` means any price.
    PriceLimit(Option<f64>),
    Manufacturer(String),
    City(String),
    Subscribe(SubscriptionPeriod),
    Payment(PaymentMethod),
    PaymentConfirmed,
    CancelSubscription,
    ConfirmCancel,
}

impl Action {
    /// Parse a transport-level action into the navigator's action space.
    pub fn parse(kind: &ActionKind) -> Action {
        match kind {
            ActionKind::Command(cmd) => match cmd.as_str() {
                "start" => Action::Command(Command::Start),
                "catalog" => Action::Command(Command::Catalog),
                "search" => Action::Command(Command::Search),
                "subscription" => Action::Command(Command::Subscription),
                "profile" => Action::Command(Command::Profile),
                "about" => Action::Command(Command::About),
                "cancel" => Action::Command(Command::Cancel),
                _ => Action::Unrecognized,
            },
            ActionKind::Button(data) => parse_button(data)
                .map(Action::Button)
                .unwrap_or(Action::Unrecognized),
            ActionKind::Text(text) => Action::Text(text.trim().to_string()),
        }
    }
}

fn parse_button(data: &str) -> Option<ButtonAction> {
    // Fixed payloads first, then prefixed ones (longest prefix wins).
    match data {
        "back_to_menu" => return Some(ButtonAction::BackToMenu),
        "catalog" => return Some(ButtonAction::Catalog),
        "search" => return Some(ButtonAction::Search),
        "about" => return Some(ButtonAction::About),
        "profile" => return Some(ButtonAction::Profile),
        "subscription" => return Some(ButtonAction::Subscription),
        "back_to_results" => return Some(ButtonAction::BackToResults),
        "payment_confirmed" => return Some(ButtonAction::PaymentConfirmed),
        "cancel_subscription" => return Some(ButtonAction::CancelSubscription),
        "confirm_cancel" => return Some(ButtonAction::ConfirmCancel),
        "price_any" => return Some(ButtonAction::PriceLimit(None)),
        _ => {}
    }

    if let Some(rest) = data.strip_prefix("quick_search_") {
        return SearchKind::from_str(rest).ok().map(ButtonAction::QuickSearch);
    }
    if let Some(rest) = data.strip_prefix("search_in_") {
        return rest.parse().ok().map(ButtonAction::SearchInCategory);
    }
    if let Some(rest) = data.strip_prefix("show_all_") {
        return rest.parse().ok().map(ButtonAction::ShowAll);
    }
    if let Some(rest) = data.strip_prefix("category_") {
        return rest.parse().ok().map(ButtonAction::Category);
    }
    if let Some(rest) = data.strip_prefix("product_") {
        return rest.parse().ok().map(ButtonAction::Product);
    }
    if let Some(rest) = data.strip_prefix("price_") {
        return rest.parse().ok().map(|p| ButtonAction::PriceLimit(Some(p)));
    }
    if let Some(rest) = data.strip_prefix("manufacturer_") {
        return Some(ButtonAction::Manufacturer(rest.to_string()));
    }
    if let Some(rest) = data.strip_prefix("city_") {
        return Some(ButtonAction::City(rest.to_string()));
    }
    if let Some(rest) = data.strip_prefix("subscribe_") {
        return SubscriptionPeriod::from_str(rest)
            .ok()
            .map(ButtonAction::Subscribe);
    }
    if let Some(rest) = data.strip_prefix("payment_") {
        return PaymentMethod::from_str(rest).ok().map(ButtonAction::Payment);
    }

    None
}
