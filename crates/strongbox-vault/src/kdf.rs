// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! PBKDF2-HMAC-SHA256 key derivation from the master passphrase.
//!
//! Derivation is deterministic: the same passphrase, salt and parameters
//! always yield the same key. The iteration count is stored with the salt so
//! an existing vault keeps unlocking after the configured default changes.

use std::num::NonZeroU32;

use ring::pbkdf2;
use ring::rand::{SecureRandom, SystemRandom};
use secrecy::{ExposeSecret, SecretString};
use strongbox_core::{KdfParams, SALT_LEN, Salt, VaultError};
use zeroize::Zeroizing;

use crate::key::{KEY_LEN, MasterKey};

static PBKDF2_ALG: pbkdf2::Algorithm = pbkdf2::PBKDF2_HMAC_SHA256;

/// Derive the master key from a passphrase and the vault salt.
///
/// Fails with [`VaultError::InvalidInput`] for an empty passphrase or an
/// iteration count below the floor.
pub fn derive_key(
    passphrase: &SecretString,
    salt: &Salt,
    params: KdfParams,
) -> Result<MasterKey, VaultError> {
    params.validate()?;

    let secret = passphrase.expose_secret();
    if secret.is_empty() {
        return Err(VaultError::InvalidInput(
            "passphrase must not be empty".to_string(),
        ));
    }

    let iterations = NonZeroU32::new(params.iterations).ok_or_else(|| {
        VaultError::InvalidInput("KDF iteration count must be non-zero".to_string())
    })?;

    let mut output = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2::derive(
        PBKDF2_ALG,
        iterations,
        salt.as_bytes(),
        secret.as_bytes(),
        output.as_mut_slice(),
    );

    Ok(MasterKey::from_bytes(output))
}

/// Run [`derive_key`] on the blocking pool so the calling task suspends
/// instead of stalling the runtime.
pub async fn derive_key_async(
    passphrase: &SecretString,
    salt: Salt,
    params: KdfParams,
) -> Result<MasterKey, VaultError> {
    let passphrase = SecretString::from(passphrase.expose_secret().to_owned());
    tokio::task::spawn_blocking(move || derive_key(&passphrase, &salt, params))
        .await
        .map_err(|e| VaultError::Internal(format!("key derivation task failed: {e}")))?
}

/// Generate a random salt for a new vault.
pub fn generate_salt() -> Result<Salt, VaultError> {
    let rng = SystemRandom::new();
    let mut salt = [0u8; SALT_LEN];
    rng.fill(&mut salt)
        .map_err(|_| VaultError::Internal("failed to generate random salt".to_string()))?;
    Ok(Salt::from_bytes(salt))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pass(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    #[test]
    fn derive_key_is_deterministic() {
        let salt = Salt::from_bytes([1u8; SALT_LEN]);
        let key1 = derive_key(&pass("CorrectHorse1!"), &salt, KdfParams::minimum()).unwrap();
        let key2 = derive_key(&pass("CorrectHorse1!"), &salt, KdfParams::minimum()).unwrap();
        assert_eq!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn different_passphrase_gives_different_key() {
        let salt = Salt::from_bytes([2u8; SALT_LEN]);
        let key1 = derive_key(&pass("passphrase one"), &salt, KdfParams::minimum()).unwrap();
        let key2 = derive_key(&pass("passphrase two"), &salt, KdfParams::minimum()).unwrap();
        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn different_salt_gives_different_key() {
        let p = pass("same passphrase");
        let key1 = derive_key(&p, &Salt::from_bytes([1u8; SALT_LEN]), KdfParams::minimum()).unwrap();
        let key2 = derive_key(&p, &Salt::from_bytes([2u8; SALT_LEN]), KdfParams::minimum()).unwrap();
        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn iteration_count_changes_the_key() {
        let p = pass("same passphrase");
        let salt = Salt::from_bytes([3u8; SALT_LEN]);
        let key1 = derive_key(&p, &salt, KdfParams::minimum()).unwrap();
        let key2 = derive_key(&p, &salt, KdfParams::new(100_001).unwrap()).unwrap();
        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn empty_passphrase_is_invalid_input() {
        let salt = Salt::from_bytes([0u8; SALT_LEN]);
        let err = derive_key(&pass(""), &salt, KdfParams::minimum()).unwrap_err();
        assert!(matches!(err, VaultError::InvalidInput(_)));
    }

    #[test]
    fn weak_params_are_rejected() {
        let salt = Salt::from_bytes([0u8; SALT_LEN]);
        let params = KdfParams { iterations: 1_000 };
        let err = derive_key(&pass("Abcdef12!"), &salt, params).unwrap_err();
        assert!(matches!(err, VaultError::InvalidInput(_)));
    }

    #[test]
    fn generate_salt_produces_random_values() {
        assert_ne!(generate_salt().unwrap(), generate_salt().unwrap());
    }

    #[tokio::test]
    async fn async_derivation_matches_blocking() {
        let salt = Salt::from_bytes([9u8; SALT_LEN]);
        let p = pass("Abcdef12!");
        let blocking = derive_key(&p, &salt, KdfParams::minimum()).unwrap();
        let offloaded = derive_key_async(&p, salt, KdfParams::minimum()).await.unwrap();
        assert_eq!(blocking.as_bytes(), offloaded.as_bytes());
    }
}
