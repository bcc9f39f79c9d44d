// SPDX-FileCopyrightText: 2026 Divano Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query modules for CRUD operations on storage entities.

pub mod categories;
pub mod cities;
pub mod products;
pub mod subscriptions;
pub mod users;

use divano_core::{SubscriptionPeriod, SubscriptionStatus};

/// Parse a stored status code, mapping bad data to a conversion failure.
pub(crate) fn parse_status(code: String, idx: usize) -> rusqlite::Result<SubscriptionStatus> {
    code.parse().map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Text,
            format!("invalid subscription status `{code}`").into(),
        )
    })
}

/// Parse a stored period code. `None` stays `None` (historical rows).
pub(crate) fn parse_period(
    code: Option<String>,
    idx: usize,
) -> rusqlite::Result<Option<SubscriptionPeriod>> {
    match code {
        None => Ok(None),
        Some(code) => code.parse().map(Some).map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                idx,
                rusqlite::types::Type::Text,
                format!("invalid subscription period `{code}`").into(),
            )
        }),
    }
}
