// SPDX-FileCopyrightText: 2026 Divano Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for config loading, merging, and diagnostics.

use divano_config::{load_and_validate_str, ConfigError};
use divano_core::SubscriptionPeriod;

#[test]
fn minimal_config_loads_with_defaults() {
    let config = load_and_validate_str("").unwrap();
    assert_eq!(config.agent.name, "divano");
    assert_eq!(config.agent.log_level, "info");
    assert_eq!(config.auth.auth_code, "M1234");
    assert_eq!(config.pricing.month, 500.0);
    assert_eq!(config.pricing.year, 5000.0);
    assert_eq!(config.pricing.forever, 0.0);
    assert!(config.storage.wal_mode);
    assert!(config.telegram.bot_token.is_none());
}

#[test]
fn full_config_round_trips() {
    let config = load_and_validate_str(
        r#"
[agent]
name = "furniture-shop"
log_level = "debug"

[telegram]
bot_token = "123456:ABC-DEF"

[auth]
auth_code = "K7"

[pricing]
month = 600.0
year = 6000.0
forever = 100.0

[storage]
database_path = "/tmp/shop.db"
wal_mode = false
"#,
    )
    .unwrap();

    assert_eq!(config.agent.name, "furniture-shop");
    assert_eq!(config.agent.log_level, "debug");
    assert_eq!(config.telegram.bot_token.as_deref(), Some("123456:ABC-DEF"));
    assert_eq!(config.auth.auth_code, "K7");
    assert_eq!(config.pricing.price_for(SubscriptionPeriod::Month), 600.0);
    assert_eq!(config.pricing.price_for(SubscriptionPeriod::Year), 6000.0);
    assert_eq!(config.pricing.price_for(SubscriptionPeriod::Forever), 100.0);
    assert_eq!(config.storage.database_path, "/tmp/shop.db");
    assert!(!config.storage.wal_mode);
}

#[test]
fn unknown_key_produces_suggestion() {
    let errors = load_and_validate_str("[auth]\nauth_cod = \"M1234\"\n").unwrap_err();
    let unknown = errors
        .iter()
        .find_map(|e| match e {
            ConfigError::UnknownKey { key, suggestion, .. } => {
                Some((key.clone(), suggestion.clone()))
            }
            _ => None,
        })
        .expect("should report an unknown key");
    assert!(unknown.0.contains("auth_cod"));
    assert_eq!(unknown.1.as_deref(), Some("auth_code"));
}

#[test]
fn wrong_type_is_reported() {
    let errors = load_and_validate_str("[pricing]\nmonth = \"five hundred\"\n").unwrap_err();
    assert!(errors
        .iter()
        .any(|e| matches!(e, ConfigError::InvalidType { .. } | ConfigError::Other(_))));
}

#[test]
fn validation_errors_are_collected_not_fail_fast() {
    let errors = load_and_validate_str(
        r#"
[agent]
log_level = "loud"

[auth]
auth_code = ""

[pricing]
month = -1.0
"#,
    )
    .unwrap_err();
    let validation_count = errors
        .iter()
        .filter(|e| matches!(e, ConfigError::Validation { .. }))
        .count();
    assert!(validation_count >= 3, "expected all three validation errors");
}
