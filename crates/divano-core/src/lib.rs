// SPDX-FileCopyrightText: 2026 Divano Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Divano storefront bot.
//!
//! This crate provides the foundational trait definitions, error types, and
//! domain types used throughout the Divano workspace. The channel and
//! storage adapters implement traits defined here.

pub mod error;
pub mod traits;
pub mod types;

pub use error::DivanoError;
pub use types::{
    ActionKind, AdapterType, Button, Category, City, HealthStatus, InboundEvent, MessageId,
    NewSubscription, OutboundScreen, PaymentMethod, Product, ProductFilter, ScreenView,
    SearchKind, Subscription, SubscriptionPeriod, SubscriptionStatus, User, UserProfile,
};

pub use traits::{CatalogStore, ChannelAdapter, PluginAdapter};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_variants_cover_the_taxonomy() {
        let _config = DivanoError::Config("test".into());
        let _storage = DivanoError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _channel = DivanoError::Channel {
            message: "test".into(),
            source: None,
        };
        let _not_found = DivanoError::not_found("user");
        let _invalid_input = DivanoError::InvalidInput("bad price".into());
        let _invalid_code = DivanoError::InvalidCode;
        let _no_sub = DivanoError::NoActiveSubscription;
        let _internal = DivanoError::Internal("test".into());
    }

    #[test]
    fn not_found_message_names_the_entity() {
        let err = DivanoError::not_found("product");
        assert_eq!(err.to_string(), "product not found");
    }

    #[test]
    fn adapter_traits_are_object_safe() {
        fn _assert_plugin_adapter(_: &dyn PluginAdapter) {}
        fn _assert_channel_adapter(_: &dyn ChannelAdapter) {}
        fn _assert_catalog_store(_: &dyn CatalogStore) {}
    }
}
