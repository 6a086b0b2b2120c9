// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Master passphrase strength policy, applied when a vault is created.

use secrecy::{ExposeSecret, SecretString};
use strongbox_core::VaultError;

/// Minimum master passphrase length in characters.
pub const MIN_PASSPHRASE_LENGTH: usize = 8;

/// Check a new master passphrase against the creation policy.
///
/// Requires at least [`MIN_PASSPHRASE_LENGTH`] characters with at least one
/// lowercase letter, uppercase letter, digit and symbol. Every unmet rule is
/// listed in the error.
pub fn validate_master_passphrase(passphrase: &SecretString) -> Result<(), VaultError> {
    let value = passphrase.expose_secret();

    if value.trim().is_empty() {
        return Err(VaultError::InvalidInput(
            "passphrase cannot be empty".to_string(),
        ));
    }

    let mut missing = Vec::new();
    let length = value.chars().count();
    if length < MIN_PASSPHRASE_LENGTH {
        missing.push(format!(
            "at least {MIN_PASSPHRASE_LENGTH} characters (got {length})"
        ));
    }
    if !value.chars().any(|c| c.is_lowercase()) {
        missing.push("a lowercase letter".to_string());
    }
    if !value.chars().any(|c| c.is_uppercase()) {
        missing.push("an uppercase letter".to_string());
    }
    if !value.chars().any(|c| c.is_ascii_digit()) {
        missing.push("a digit".to_string());
    }
    if !value.chars().any(|c| !c.is_alphanumeric() && !c.is_whitespace()) {
        missing.push("a symbol".to_string());
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(VaultError::InvalidInput(format!(
            "passphrase must contain {}",
            missing.join(", ")
        )))
    }
}
