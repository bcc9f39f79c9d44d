// SPDX-FileCopyrightText: 2026 Divano Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Divano storefront bot.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use divano_core::SubscriptionPeriod;
use serde::{Deserialize, Serialize};

/// Top-level Divano configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DivanoConfig {
    /// Bot identity and logging settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Telegram bot integration settings.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Authorization code settings.
    #[serde(default)]
    pub auth: AuthConfig,

    /// Subscription pricing table.
    #[serde(default)]
    pub pricing: PricingConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Bot identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the bot.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "divano".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Telegram bot integration configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Telegram Bot API token. Required to run `serve`.
    #[serde(default)]
    pub bot_token: Option<String>,
}

/// Authorization code configuration.
///
/// A single process-wide code compared by exact match; redeeming it grants a
/// flat 30-day paid period. Not tied to any individual user.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// The shared authorization code (at most 5 characters in the reference
    /// deployment).
    #[serde(default = "default_auth_code")]
    pub auth_code: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            auth_code: default_auth_code(),
        }
    }
}

fn default_auth_code() -> String {
    "M1234".to_string()
}

/// Static subscription pricing table, in the deployment's currency unit.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PricingConfig {
    #[serde(default = "default_price_month")]
    pub month: f64,

    #[serde(default = "default_price_year")]
    pub year: f64,

    /// Free for the ten-year period, matching the source deployment.
    #[serde(default)]
    pub forever: f64,
}

impl PricingConfig {
    /// Price of the given billing period.
    pub fn price_for(&self, period: SubscriptionPeriod) -> f64 {
        match period {
            SubscriptionPeriod::Month => self.month,
            SubscriptionPeriod::Year => self.year,
            SubscriptionPeriod::Forever => self.forever,
        }
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            month: default_price_month(),
            year: default_price_year(),
            forever: 0.0,
        }
    }
}

fn default_price_month() -> f64 {
    500.0
}

fn default_price_year() -> f64 {
    5000.0
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("divano").join("catalog.db"))
        .and_then(|p| p.to_str().map(String::from))
        .unwrap_or_else(|| "catalog.db".to_string())
}

fn default_wal_mode() -> bool {
    true
}
