// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as valid bind addresses, non-empty allow-lists, and sane worker limits.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::ConciergeConfig;

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &ConciergeConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    // Validate log_level is a known level
    if !VALID_LOG_LEVELS.contains(&config.agent.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "agent.log_level must be one of {}, got `{}`",
                VALID_LOG_LEVELS.join(", "),
                config.agent.log_level
            ),
        });
    }

    // Validate bind_address is not empty
    if config.gateway.bind_address.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "gateway.bind_address must not be empty".to_string(),
        });
    }

    // Validate bind_address looks like a valid IP or hostname
    if !config.gateway.bind_address.trim().is_empty() {
        let addr = config.gateway.bind_address.trim();
        // Accept valid IPv4, IPv6, or hostname patterns
        let is_valid_ip = addr.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = addr
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!(
                    "gateway.bind_address `{addr}` is not a valid IP address or hostname"
                ),
            });
        }
    }

    // Validate database_path is not empty
    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    // Validate allow-lists are non-empty
    if config.dialog.locations.is_empty() {
        errors.push(ConfigError::Validation {
            message: "dialog.locations must list at least one area".to_string(),
        });
    }

    if config.dialog.cuisines.is_empty() {
        errors.push(ConfigError::Validation {
            message: "dialog.cuisines must list at least one cuisine".to_string(),
        });
    }

    // Validate no duplicate allow-list entries
    let mut seen_locations = HashSet::new();
    for location in &config.dialog.locations {
        if !seen_locations.insert(location.to_lowercase()) {
            errors.push(ConfigError::Validation {
                message: format!("duplicate location `{location}` in dialog.locations"),
            });
        }
    }

    let mut seen_cuisines = HashSet::new();
    for cuisine in &config.dialog.cuisines {
        if !seen_cuisines.insert(cuisine.to_lowercase()) {
            errors.push(ConfigError::Validation {
                message: format!("duplicate cuisine `{cuisine}` in dialog.cuisines"),
            });
        }
    }

    // Validate party size bound
    if config.dialog.max_party_size < 1 {
        errors.push(ConfigError::Validation {
            message: format!(
                "dialog.max_party_size must be at least 1, got {}",
                config.dialog.max_party_size
            ),
        });
    }

    // Validate worker limits
    if config.worker.poll_interval_secs < 1 {
        errors.push(ConfigError::Validation {
            message: format!(
                "worker.poll_interval_secs must be at least 1, got {}",
                config.worker.poll_interval_secs
            ),
        });
    }

    if config.worker.batch_size < 1 {
        errors.push(ConfigError::Validation {
            message: format!(
                "worker.batch_size must be at least 1, got {}",
                config.worker.batch_size
            ),
        });
    }

    if config.worker.suggestion_limit < 1 {
        errors.push(ConfigError::Validation {
            message: format!(
                "worker.suggestion_limit must be at least 1, got {}",
                config.worker.suggestion_limit
            ),
        });
    }

    // Validate SMTP settings
    if config.smtp.relay.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "smtp.relay must not be empty".to_string(),
        });
    }

    if !config.smtp.from_address.contains('@') {
        errors.push(ConfigError::Validation {
            message: format!(
                "smtp.from_address `{}` is not a valid email address",
                config.smtp.from_address
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
