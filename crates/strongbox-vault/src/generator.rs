// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Random password generation.

use rand::rngs::OsRng;
use rand::seq::SliceRandom;
use secrecy::SecretString;
use strongbox_config::model::GeneratorConfig;
use strongbox_config::validation::{MAX_GENERATOR_LENGTH, MIN_GENERATOR_LENGTH};
use strongbox_core::VaultError;
use zeroize::Zeroizing;

const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";
const SYMBOLS: &[u8] = b"!@#$%^&*()-_=+[]{};:,.<>?";

fn enabled_classes(config: &GeneratorConfig) -> Vec<&'static [u8]> {
    let mut classes = Vec::with_capacity(4);
    if config.lowercase {
        classes.push(LOWERCASE);
    }
    if config.uppercase {
        classes.push(UPPERCASE);
    }
    if config.digits {
        classes.push(DIGITS);
    }
    if config.symbols {
        classes.push(SYMBOLS);
    }
    classes
}

/// Generate a password from the OS random source.
///
/// Every enabled class contributes at least one character; the rest are
/// drawn uniformly from the union of enabled classes and the result is
/// shuffled. Invalid settings are rejected, never clamped.
pub fn generate_password(config: &GeneratorConfig) -> Result<SecretString, VaultError> {
    if !(MIN_GENERATOR_LENGTH..=MAX_GENERATOR_LENGTH).contains(&config.length) {
        return Err(VaultError::InvalidInput(format!(
            "password length must be between {MIN_GENERATOR_LENGTH} and {MAX_GENERATOR_LENGTH}, got {}",
            config.length
        )));
    }

    let classes = enabled_classes(config);
    if classes.is_empty() {
        return Err(VaultError::InvalidInput(
            "at least one character class must be enabled".to_string(),
        ));
    }

    let pool: Vec<u8> = classes.iter().flat_map(|c| c.iter().copied()).collect();
    let mut rng = OsRng;
    let mut out = Zeroizing::new(Vec::with_capacity(config.length));

    for class in &classes {
        out.extend(class.choose(&mut rng));
    }
    while out.len() < config.length {
        out.extend(pool.choose(&mut rng));
    }
    out.shuffle(&mut rng);

    let password = String::from_utf8(out.to_vec())
        .map_err(|_| VaultError::Internal("generated password is not ASCII".to_string()))?;
    Ok(SecretString::from(password))
}
