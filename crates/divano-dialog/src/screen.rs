// SPDX-FileCopyrightText: 2026 Divano Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Screen states of the conversation.
//!
//! A tagged-variant enum: ephemeral scratch data (selected category, pending
//! search, pending payment) lives in the variants, so discarding a state
//! discards its scratch with it.

use chrono::{DateTime, Utc};
use divano_core::{PaymentMethod, SearchKind, SubscriptionPeriod};

/// Where a product detail view was opened from, for the back button.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductOrigin {
    /// Opened from a category product list.
    Category(i64),
    /// Opened from search results.
    Search { kind: SearchKind, value: String },
}

/// The current screen of one conversation.
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    /// Entry gate: the next free-text message is consumed as the code.
    AwaitingAuthCode,
    MainMenu,
    CatalogCategories,
    CategoryActions {
        category_id: i64,
    },
    ProductList {
        category_id: i64,
    },
    ProductDetail {
        product_id: i64,
        origin: ProductOrigin,
    },
    SearchMenu,
    /// Choosing among fixed values (price ceilings, manufacturers, cities).
    QuickSearchChoice {
        kind: SearchKind,
    },
    /// The next free-text message is consumed as the search value.
    QuickSearchValueInput {
        kind: SearchKind,
    },
    SearchResults {
        kind: SearchKind,
        value: String,
    },
    SubscriptionMenu,
    PaymentMethodChoice {
        period: SubscriptionPeriod,
    },
    PaymentPending {
        period: SubscriptionPeriod,
        method: PaymentMethod,
    },
    /// Completed purchase flow; any entry action restarts navigation.
    PaymentConfirmed {
        period: SubscriptionPeriod,
        end_date: DateTime<Utc>,
    },
    CancelConfirm,
}
