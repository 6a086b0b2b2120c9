// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Strongbox vault.

use thiserror::Error;

use crate::types::RecordId;

/// The error type shared by the vault core, the store implementations, and
/// the command-line front end.
#[derive(Debug, Error)]
pub enum VaultError {
    /// Malformed input: wrong salt or nonce length, empty required field,
    /// undecodable base64, or an out-of-range configuration value.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// AEAD tag verification failed (wrong key, tampered ciphertext or nonce).
    #[error("decryption failed -- wrong key or corrupted data")]
    Decryption,

    /// The supplied master passphrase did not open the vault.
    #[error("incorrect master passphrase")]
    Authentication,

    /// The persistence medium is full.
    #[error("storage quota exceeded -- free space or export the vault and retry")]
    QuotaExceeded,

    /// No record with the given id exists.
    #[error("record not found: {0}")]
    NotFound(RecordId),

    /// The session holds no key (never unlocked, locked, or timed out).
    #[error("vault is locked")]
    NotAuthenticated,

    /// Attempted to create a vault where one already exists.
    #[error("a vault already exists at this location")]
    VaultExists,

    /// Attempted to open a vault that was never created.
    #[error("no vault found")]
    NoVault,

    /// Storage backend errors (database, filesystem, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Configuration errors.
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for VaultError {
    fn from(err: serde_json::Error) -> Self {
        VaultError::Storage {
            source: Box::new(err),
        }
    }
}
