// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks constraints that serde attributes cannot express: the KDF floor,
//! a usable storage path, a positive idle timeout, a generator that can
//! actually produce something, and a recognized log level.

use strongbox_core::types::MIN_KDF_ITERATIONS;

use crate::diagnostic::ConfigError;
use crate::model::{StorageBackend, StrongboxConfig};

/// Shortest password the generator will produce.
pub const MIN_GENERATOR_LENGTH: usize = 4;

/// Longest password the generator will produce.
pub const MAX_GENERATOR_LENGTH: usize = 128;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &StrongboxConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.vault.kdf_iterations < MIN_KDF_ITERATIONS {
        errors.push(ConfigError::Validation {
            message: format!(
                "vault.kdf_iterations must be at least {MIN_KDF_ITERATIONS}, got {}",
                config.vault.kdf_iterations
            ),
        });
    }

    if config.storage.backend != StorageBackend::Memory && config.storage.path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: format!(
                "storage.path must not be empty for the {} backend",
                config.storage.backend
            ),
        });
    }

    if config.session.idle_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "session.idle_timeout_secs must be greater than 0".to_string(),
        });
    }

    let generator = &config.generator;
    if !(MIN_GENERATOR_LENGTH..=MAX_GENERATOR_LENGTH).contains(&generator.length) {
        errors.push(ConfigError::Validation {
            message: format!(
                "generator.length must be between {MIN_GENERATOR_LENGTH} and {MAX_GENERATOR_LENGTH}, got {}",
                generator.length
            ),
        });
    }

    if !(generator.lowercase || generator.uppercase || generator.digits || generator.symbols) {
        errors.push(ConfigError::Validation {
            message: "generator must enable at least one character class".to_string(),
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

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(errors: &[ConfigError]) -> Vec<String> {
        errors
            .iter()
            .filter_map(|e| match e {
                ConfigError::Validation { message } => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn default_config_validates() {
        let config = StrongboxConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn low_kdf_iterations_fail_validation() {
        let mut config = StrongboxConfig::default();
        config.vault.kdf_iterations = 10_000;
        let errors = validate_config(&config).unwrap_err();
        assert!(messages(&errors).iter().any(|m| m.contains("kdf_iterations")));
    }

    #[test]
    fn empty_path_is_allowed_only_for_memory_backend() {
        let mut config = StrongboxConfig::default();
        config.storage.path = "  ".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(messages(&errors).iter().any(|m| m.contains("storage.path")));

        config.storage.backend = StorageBackend::Memory;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn generator_needs_a_class_and_sane_length() {
        let mut config = StrongboxConfig::default();
        config.generator.length = 2;
        config.generator.lowercase = false;
        config.generator.uppercase = false;
        config.generator.digits = false;
        config.generator.symbols = false;
        let errors = validate_config(&config).unwrap_err();
        let msgs = messages(&errors);
        assert!(msgs.iter().any(|m| m.contains("generator.length")));
        assert!(msgs.iter().any(|m| m.contains("character class")));
    }

    #[test]
    fn all_errors_are_collected() {
        let mut config = StrongboxConfig::default();
        config.vault.kdf_iterations = 1;
        config.session.idle_timeout_secs = 0;
        config.log.level = "verbose".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn log_level_is_case_insensitive() {
        let mut config = StrongboxConfig::default();
        config.log.level = "DEBUG".to_string();
        assert!(validate_config(&config).is_ok());
    }
}
