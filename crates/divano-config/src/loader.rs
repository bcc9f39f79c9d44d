// SPDX-FileCopyrightText: 2026 Divano Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./divano.toml` > `~/.config/divano/divano.toml`
//! > `/etc/divano/divano.toml` with environment variable overrides via the
//! `DIVANO_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::DivanoConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/divano/divano.toml` (system-wide)
/// 3. `~/.config/divano/divano.toml` (user XDG config)
/// 4. `./divano.toml` (local directory)
/// 5. `DIVANO_*` environment variables
pub fn load_config() -> Result<DivanoConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(DivanoConfig::default()))
        .merge(Toml::file("/etc/divano/divano.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("divano/divano.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("divano.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<DivanoConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(DivanoConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<DivanoConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(DivanoConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `DIVANO_TELEGRAM_BOT_TOKEN` must map to
/// `telegram.bot_token`, not `telegram.bot.token`.
fn env_provider() -> Env {
    Env::prefixed("DIVANO_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: DIVANO_AUTH_AUTH_CODE -> "auth_auth_code"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("telegram_", "telegram.", 1)
            .replacen("auth_", "auth.", 1)
            .replacen("pricing_", "pricing.", 1)
            .replacen("storage_", "storage.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_yields_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.agent.name, "divano");
        assert_eq!(config.auth.auth_code, "M1234");
        assert!(config.telegram.bot_token.is_none());
    }

    #[test]
    fn toml_overrides_defaults() {
        let config = load_config_from_str(
            r#"
[agent]
name = "shop"

[auth]
auth_code = "X9"

[pricing]
month = 700.0
"#,
        )
        .unwrap();
        assert_eq!(config.agent.name, "shop");
        assert_eq!(config.auth.auth_code, "X9");
        assert_eq!(config.pricing.month, 700.0);
        // Untouched sections keep their defaults.
        assert_eq!(config.pricing.year, 5000.0);
    }
}
