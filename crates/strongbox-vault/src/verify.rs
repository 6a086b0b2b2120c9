// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Master passphrase verification by trial decryption.
//!
//! Nothing derived from the passphrase is ever stored. A candidate key is
//! accepted when it opens the secret of the first stored record.

use secrecy::SecretString;
use strongbox_core::{EncryptedRecord, KdfParams, Salt, VaultError};
use tracing::{debug, warn};

use crate::cipher;
use crate::kdf;
use crate::key::MasterKey;

/// Outcome of checking a key against stored ciphertext.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    /// The key opened the first record.
    Verified,
    /// The key did not open the first record.
    Rejected,
    /// The vault has no records, so there is nothing to check against.
    Unverifiable,
}

/// Check `key` against the first stored record.
pub fn check_key(key: &MasterKey, records: &[EncryptedRecord]) -> Verification {
    let Some(first) = records.first() else {
        return Verification::Unverifiable;
    };

    match cipher::open_secret(first, key) {
        Ok(_) => Verification::Verified,
        Err(e) => {
            debug!(record_id = %first.id, error = %e, "trial decryption failed");
            Verification::Rejected
        }
    }
}

/// Decide whether `passphrase` created the vault.
///
/// Decryption failures are `Ok(false)`. Only invalid input (such as an empty
/// passphrase) is an error. An empty vault cannot be checked and is accepted
/// with a warning.
pub fn verify_passphrase(
    passphrase: &SecretString,
    salt: &Salt,
    params: KdfParams,
    records: &[EncryptedRecord],
) -> Result<bool, VaultError> {
    let key = kdf::derive_key(passphrase, salt, params)?;
    Ok(match check_key(&key, records) {
        Verification::Verified => true,
        Verification::Rejected => false,
        Verification::Unverifiable => {
            warn!("vault has no records; passphrase accepted without verification");
            true
        }
    })
}
