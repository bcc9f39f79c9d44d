// SPDX-FileCopyrightText: 2026 Divano Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Divano storefront bot.

use thiserror::Error;

/// The primary error type used across all Divano adapter traits and core operations.
#[derive(Debug, Error)]
pub enum DivanoError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Channel adapter errors (connection failure, message format, rate limiting).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A requested entity (user, category, product) does not exist.
    #[error("{what} not found")]
    NotFound { what: String },

    /// Malformed user input (unparseable price, empty required value).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The submitted authorization code does not match the configured one.
    #[error("invalid authorization code")]
    InvalidCode,

    /// Cancellation was requested but no current subscription exists.
    #[error("no active subscription")]
    NoActiveSubscription,

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl DivanoError {
    /// Shorthand for a [`DivanoError::NotFound`] with the given entity name.
    pub fn not_found(what: impl Into<String>) -> Self {
        DivanoError::NotFound { what: what.into() }
    }
}
