// SPDX-FileCopyrightText: 2026 Firstreply Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Clock strings, timezones and enum values are already checked during
//! deserialization; this pass covers constraints that span several fields.

use crate::diagnostic::ConfigError;
use crate::model::FirstReplyConfig;

/// Log levels accepted by `log.level`.
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &FirstReplyConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let hours = &config.business_hours;

    if hours.start >= hours.end {
        errors.push(ConfigError::Validation {
            message: format!(
                "business_hours.start `{}` must be earlier than business_hours.end `{}`",
                hours.start, hours.end
            ),
        });
    }

    let level = config.log.level.trim().to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "log.level `{}` is not one of {}",
                config.log.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
