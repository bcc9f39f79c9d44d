// SPDX-FileCopyrightText: 2026 Divano Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common domain and transport types used across adapter traits and services.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Unique identifier for a delivered chat message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the type of adapter behind the plugin trait.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Channel,
    Storage,
}

// --- Subscription domain ---

/// Subscription state of a user.
///
/// Stored as short lowercase string codes (`free`, `paid`, `trial`, `expired`).
/// `Trial` exists for schema compatibility; no operation ever grants it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Free,
    Paid,
    Trial,
    Expired,
}

/// Billing period of a subscription.
///
/// `Forever` is modeled as ten years, matching the source system.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionPeriod {
    Month,
    Year,
    Forever,
}

impl SubscriptionPeriod {
    /// Day count added to the current end date on purchase or renewal.
    pub fn days(self) -> i64 {
        match self {
            SubscriptionPeriod::Month => 30,
            SubscriptionPeriod::Year => 365,
            SubscriptionPeriod::Forever => 3650,
        }
    }

    /// The period as a chrono duration.
    pub fn delta(self) -> Duration {
        Duration::days(self.days())
    }
}

/// Simulated payment method chosen during checkout.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Card,
    Sbp,
}

/// A registered bot user.
///
/// `subscription_status` and `subscription_expiry` are denormalized from the
/// latest subscription row and kept in sync by every write path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub telegram_id: String,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub registration_date: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    pub subscription_status: SubscriptionStatus,
    pub subscription_expiry: Option<DateTime<Utc>>,
    pub is_active: bool,
}

/// Profile fields supplied by the chat platform on each contact.
///
/// Fields merge-overwrite the stored user only when non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserProfile {
    pub telegram_id: String,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
}

/// One row of the append-only subscription history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: i64,
    pub user_id: i64,
    pub status: SubscriptionStatus,
    /// Stored period kind. `None` on historical rows created before the
    /// column existed; the days-left inference covers those.
    pub period: Option<SubscriptionPeriod>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub payment_id: Option<String>,
    pub payment_amount: Option<f64>,
    pub payment_date: Option<DateTime<Utc>>,
}

/// A subscription row to be appended, before the database assigns an id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSubscription {
    pub user_id: i64,
    pub status: SubscriptionStatus,
    pub period: Option<SubscriptionPeriod>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub payment_id: Option<String>,
    pub payment_amount: Option<f64>,
    pub payment_date: Option<DateTime<Utc>>,
}

// --- Catalog domain ---

/// A furniture category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// A catalog product.
///
/// `form`/`mechanism`/`filling` apply to seating, `lifting_mechanism` to
/// beds, `has_box` to ottomans. Attributes irrelevant to a product's
/// category are simply unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub product_code: String,
    pub category_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub manufacturer: Option<String>,
    pub size: Option<String>,
    pub city: Option<String>,
    pub form: Option<String>,
    pub mechanism: Option<String>,
    pub filling: Option<String>,
    pub lifting_mechanism: Option<bool>,
    pub has_box: Option<bool>,
    pub image_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A delivery city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub id: i64,
    pub name: String,
    pub region: Option<String>,
}

/// Multi-attribute product filter. Unset fields are ignored; text fields
/// match case-insensitively as substrings. Results are always ordered by
/// ascending price.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub category_id: Option<i64>,
    pub max_price: Option<f64>,
    pub manufacturer: Option<String>,
    pub city: Option<String>,
    pub name: Option<String>,
    pub code: Option<String>,
    pub form: Option<String>,
    pub mechanism: Option<String>,
    pub filling: Option<String>,
    pub lifting_mechanism: Option<bool>,
    pub has_box: Option<bool>,
}

/// Quick-search dimension offered by the search menu.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SearchKind {
    Price,
    Manufacturer,
    City,
    Name,
    Code,
}

// --- Transport boundary ---

/// The three kinds of inbound user action the core understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionKind {
    /// A slash command, without the leading `/` (e.g. `start`).
    Command(String),
    /// An inline button press, carrying the button's callback payload.
    Button(String),
    /// A free-text message, consumed as a value by input screens.
    Text(String),
}

/// An inbound action received from a channel adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundEvent {
    /// Chat identifier; one conversation per external user.
    pub conversation_id: String,
    /// Sender profile as reported by the platform on this contact.
    pub profile: UserProfile,
    pub action: ActionKind,
    /// Message carrying the pressed button, for edit-in-place delivery.
    pub message_id: Option<String>,
}

/// One inline button: a label and the callback payload it sends back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub data: String,
}

impl Button {
    pub fn new(label: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            data: data.into(),
        }
    }
}

/// A rendered screen: text, inline button rows, and an optional image.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScreenView {
    pub text: String,
    pub keyboard: Vec<Vec<Button>>,
    pub image: Option<String>,
}

/// An outbound screen addressed to a conversation.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundScreen {
    pub conversation_id: String,
    pub view: ScreenView,
    /// When set, the adapter edits this message in place instead of
    /// sending a new one.
    pub edit_message_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn status_codes_round_trip_as_lowercase() {
        for (status, code) in [
            (SubscriptionStatus::Free, "free"),
            (SubscriptionStatus::Paid, "paid"),
            (SubscriptionStatus::Trial, "trial"),
            (SubscriptionStatus::Expired, "expired"),
        ] {
            assert_eq!(status.to_string(), code);
            assert_eq!(SubscriptionStatus::from_str(code).unwrap(), status);
        }
    }

    #[test]
    fn period_day_counts() {
        assert_eq!(SubscriptionPeriod::Month.days(), 30);
        assert_eq!(SubscriptionPeriod::Year.days(), 365);
        assert_eq!(SubscriptionPeriod::Forever.days(), 3650);
    }

    #[test]
    fn period_codes_round_trip() {
        for (period, code) in [
            (SubscriptionPeriod::Month, "month"),
            (SubscriptionPeriod::Year, "year"),
            (SubscriptionPeriod::Forever, "forever"),
        ] {
            assert_eq!(period.to_string(), code);
            assert_eq!(SubscriptionPeriod::from_str(code).unwrap(), period);
        }
    }

    #[test]
    fn product_filter_defaults_to_no_constraints() {
        let filter = ProductFilter::default();
        assert!(filter.category_id.is_none());
        assert!(filter.max_price.is_none());
        assert!(filter.lifting_mechanism.is_none());
    }

    #[test]
    fn status_serializes_as_short_code() {
        let json = serde_json::to_string(&SubscriptionStatus::Paid).unwrap();
        assert_eq!(json, "\"paid\"");
    }
}
