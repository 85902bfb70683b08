//! Config validation module
//!
//! Rules:
//! - topic required, non-empty
//! - nsqd address required, non-empty
//! - regex rule, when present, must be valid syntax

use contracts::{RelayConfig, RelayError};
use validator::Validate;

/// Validate a RelayConfig
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(cfg: &RelayConfig) -> Result<(), RelayError> {
    validate_declared(cfg)?;
    validate_regex(cfg)?;
    Ok(())
}

/// Run the field constraints declared on the config type itself
fn validate_declared(cfg: &RelayConfig) -> Result<(), RelayError> {
    cfg.validate().map_err(|errs| {
        for (field, errors) in errs.field_errors() {
            if let Some(err) = errors.first() {
                let message = err.message.clone().unwrap_or_else(|| err.code.clone());
                return RelayError::config_validation(field, message);
            }
        }
        RelayError::config_validation("config", errs.to_string())
    })
}

/// Check regex syntax; a broken filter must never reach the dispatcher
fn validate_regex(cfg: &RelayConfig) -> Result<(), RelayError> {
    if let Some(pattern) = &cfg.regex {
        regex::bytes::Regex::new(pattern)
            .map_err(|e| RelayError::config_validation("regex", e.to_string()))?;
    }
    Ok(())
}
