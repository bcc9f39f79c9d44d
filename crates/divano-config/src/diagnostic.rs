// SPDX-FileCopyrightText: 2026 Divano Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Figment-to-miette error bridge with fuzzy match suggestions.
//!
//! Converts Figment deserialization errors into miette diagnostics with
//! valid key listings and "did you mean?" suggestions using Jaro-Winkler
//! string similarity.

use miette::Diagnostic;
use thiserror::Error;

/// Minimum Jaro-Winkler similarity score to suggest a correction.
/// 0.75 catches common typos like `auth_cod` -> `auth_code` while
/// filtering noise.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// A configuration error with diagnostic information.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// An unknown key was found in the configuration.
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(divano::config::unknown_key),
        help("{}", format_unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        /// The unrecognized key name.
        key: String,
        /// Suggested correction via fuzzy matching, if any.
        suggestion: Option<String>,
        /// List of valid keys for the section.
        valid_keys: String,
    },

    /// A configuration value has the wrong type.
    #[error("invalid type for key `{key}`: {detail}")]
    #[diagnostic(code(divano::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        /// The key with the wrong type.
        key: String,
        /// Description of the type mismatch.
        detail: String,
        /// What type was expected.
        expected: String,
    },

    /// A required configuration key is missing.
    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(divano::config::missing_key),
        help("add `{key} = <value>` to your divano.toml")
    )]
    MissingKey {
        /// The missing key name.
        key: String,
    },

    /// A validation error for a config value.
    #[error("validation error: {message}")]
    #[diagnostic(code(divano::config::validation))]
    Validation {
        /// Description of the validation failure.
        message: String,
    },

    /// Catch-all for other configuration errors.
    #[error("configuration error: {0}")]
    #[diagnostic(code(divano::config::other))]
    Other(String),
}

/// Format the help message for unknown key errors.
fn format_unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? Valid keys: {valid_keys}"),
        None => format!("valid keys: {valid_keys}"),
    }
}

/// Find the closest valid key to `actual` via Jaro-Winkler similarity.
fn suggest(actual: &str, valid: &[&str]) -> Option<String> {
    valid
        .iter()
        .map(|candidate| (strsim::jaro_winkler(actual, candidate), *candidate))
        .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, candidate)| candidate.to_string())
}

/// Convert a Figment error into a list of [`ConfigError`] diagnostics.
pub fn figment_to_config_errors(err: figment::Error) -> Vec<ConfigError> {
    let mut out = Vec::new();

    for e in err {
        let path = e.path.join(".");
        match &e.kind {
            figment::error::Kind::UnknownField(field, expected) => {
                out.push(ConfigError::UnknownKey {
                    key: if path.is_empty() {
                        field.clone()
                    } else {
                        format!("{path}.{field}")
                    },
                    suggestion: suggest(field, expected),
                    valid_keys: expected.join(", "),
                });
            }
            figment::error::Kind::InvalidType(actual, expected) => {
                out.push(ConfigError::InvalidType {
                    key: path,
                    detail: format!("found {actual}"),
                    expected: expected.clone(),
                });
            }
            figment::error::Kind::MissingField(field) => {
                out.push(ConfigError::MissingKey {
                    key: field.to_string(),
                });
            }
            _ => out.push(ConfigError::Other(e.to_string())),
        }
    }

    if out.is_empty() {
        out.push(ConfigError::Other("unknown configuration error".into()));
    }
    out
}

/// Render a list of config errors to stderr as miette reports.
pub fn render_errors(errors: &[ConfigError]) {
    for err in errors {
        eprintln!(
            "{:?}",
            miette::Report::msg(format!(
                "{err}{}",
                err.help()
                    .map(|h| format!("\n  help: {h}"))
                    .unwrap_or_default()
            ))
        );
    }
}
