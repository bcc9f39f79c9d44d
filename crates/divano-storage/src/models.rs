// SPDX-FileCopyrightText: 2026 Divano Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model types for storage entities.
//!
//! The canonical types are defined in `divano-core::types` for use across
//! adapter trait boundaries. This module re-exports them for convenience
//! within the storage crate.

pub use divano_core::types::{
    Category, City, NewSubscription, Product, ProductFilter, Subscription, SubscriptionPeriod,
    SubscriptionStatus, User, UserProfile,
};
