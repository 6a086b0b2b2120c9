// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Passphrase acquisition via TTY prompt or the `STRONGBOX_PASSPHRASE`
//! environment variable.

use secrecy::SecretString;
use strongbox_core::VaultError;
use zeroize::Zeroizing;

/// The environment variable name for providing the master passphrase.
pub const PASSPHRASE_ENV_VAR: &str = "STRONGBOX_PASSPHRASE";

fn from_env() -> Option<SecretString> {
    match std::env::var(PASSPHRASE_ENV_VAR) {
        Ok(value) if !value.is_empty() => Some(SecretString::from(value)),
        _ => None,
    }
}

fn read_hidden(prompt: &str) -> Result<Zeroizing<String>, VaultError> {
    rpassword::prompt_password(prompt)
        .map(Zeroizing::new)
        .map_err(|e| VaultError::InvalidInput(format!("failed to read passphrase: {e}")))
}

fn no_source() -> VaultError {
    VaultError::InvalidInput(format!(
        "no passphrase provided. Set {PASSPHRASE_ENV_VAR} or run interactively."
    ))
}

/// Get the master passphrase from the environment or an interactive prompt.
///
/// Priority:
/// 1. `STRONGBOX_PASSPHRASE` environment variable (scripts, CI)
/// 2. Interactive TTY prompt via `rpassword`
pub fn get_passphrase() -> Result<SecretString, VaultError> {
    if let Some(passphrase) = from_env() {
        return Ok(passphrase);
    }

    if std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        let passphrase = read_hidden("Master passphrase: ")?;
        if passphrase.is_empty() {
            return Err(VaultError::InvalidInput(
                "empty passphrase not allowed".to_string(),
            ));
        }
        return Ok(SecretString::from(passphrase.as_str().to_owned()));
    }

    Err(no_source())
}

/// Get a new master passphrase, prompting twice when interactive.
///
/// The environment variable needs no confirmation.
pub fn get_passphrase_with_confirm() -> Result<SecretString, VaultError> {
    if let Some(passphrase) = from_env() {
        return Ok(passphrase);
    }

    if std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        let first = read_hidden("New master passphrase: ")?;
        let second = read_hidden("Confirm master passphrase: ")?;

        if *first != *second {
            return Err(VaultError::InvalidInput(
                "passphrases do not match".to_string(),
            ));
        }
        if first.is_empty() {
            return Err(VaultError::InvalidInput(
                "empty passphrase not allowed".to_string(),
            ));
        }
        return Ok(SecretString::from(first.as_str().to_owned()));
    }

    Err(no_source())
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;
    use serial_test::serial;

    use super::*;

    #[test]
    #[serial]
    fn passphrase_from_env_var() {
        // SAFETY: env mutation is serialized across tests.
        unsafe { std::env::set_var(PASSPHRASE_ENV_VAR, "CorrectHorse1!") };
        let result = get_passphrase();
        unsafe { std::env::remove_var(PASSPHRASE_ENV_VAR) };

        assert_eq!(result.unwrap().expose_secret(), "CorrectHorse1!");
    }

    #[test]
    #[serial]
    fn confirm_variant_accepts_env_var() {
        unsafe { std::env::set_var(PASSPHRASE_ENV_VAR, "Abcdef12!") };
        let result = get_passphrase_with_confirm();
        unsafe { std::env::remove_var(PASSPHRASE_ENV_VAR) };

        assert!(result.is_ok());
    }

    #[test]
    #[serial]
    fn empty_env_var_is_ignored() {
        unsafe { std::env::set_var(PASSPHRASE_ENV_VAR, "") };
        let from_env = from_env();
        unsafe { std::env::remove_var(PASSPHRASE_ENV_VAR) };

        assert!(from_env.is_none());
    }
}
