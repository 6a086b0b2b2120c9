// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record data contracts and the persisted vault layout.
//!
//! Plaintext types ([`RecordDraft`], [`PlaintextRecord`]) live only in memory
//! and zero their sensitive fields on drop. [`EncryptedRecord`] and
//! [`VaultDocument`] are the persisted forms; their serde representation is
//! the on-disk layout.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::VaultError;

/// Salt length in bytes.
pub const SALT_LEN: usize = 16;

/// AES-GCM nonce length in bytes.
pub const NONCE_LEN: usize = 12;

/// Lowest PBKDF2 iteration count the vault accepts.
pub const MIN_KDF_ITERATIONS: u32 = 100_000;

/// PBKDF2 iteration count used for new vaults unless configured otherwise.
pub const DEFAULT_KDF_ITERATIONS: u32 = 600_000;

/// Opaque unique identifier of a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl RecordId {
    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Decode a base64 field, naming it in the error.
pub fn decode_base64(field: &str, value: &str) -> Result<Vec<u8>, VaultError> {
    BASE64
        .decode(value)
        .map_err(|e| VaultError::InvalidInput(format!("{field} is not valid base64: {e}")))
}

/// Encode bytes as standard padded base64.
pub fn encode_base64(bytes: &[u8]) -> String {
    BASE64.encode(bytes)
}

/// Random per-vault salt for key derivation. Serialized as base64.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Salt([u8; SALT_LEN]);

impl Salt {
    pub const fn from_bytes(bytes: [u8; SALT_LEN]) -> Self {
        Self(bytes)
    }

    /// Build a salt from a slice, rejecting any length other than [`SALT_LEN`].
    pub fn from_slice(bytes: &[u8]) -> Result<Self, VaultError> {
        let array: [u8; SALT_LEN] = bytes.try_into().map_err(|_| {
            VaultError::InvalidInput(format!(
                "salt must be exactly {SALT_LEN} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self(array))
    }

    pub fn from_base64(value: &str) -> Result<Self, VaultError> {
        Self::from_slice(&decode_base64("salt", value)?)
    }

    pub fn as_bytes(&self) -> &[u8; SALT_LEN] {
        &self.0
    }

    pub fn to_base64(&self) -> String {
        encode_base64(&self.0)
    }
}

impl Serialize for Salt {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base64())
    }
}

impl<'de> Deserialize<'de> for Salt {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        Salt::from_base64(&encoded).map_err(serde::de::Error::custom)
    }
}

/// AES-GCM nonce. Generated fresh for every encryption call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Nonce([u8; NONCE_LEN]);

impl Nonce {
    pub const fn from_bytes(bytes: [u8; NONCE_LEN]) -> Self {
        Self(bytes)
    }

    /// Build a nonce from a slice, rejecting any length other than [`NONCE_LEN`].
    pub fn from_slice(bytes: &[u8]) -> Result<Self, VaultError> {
        let array: [u8; NONCE_LEN] = bytes.try_into().map_err(|_| {
            VaultError::InvalidInput(format!(
                "nonce must be exactly {NONCE_LEN} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self(array))
    }

    pub fn from_base64(value: &str) -> Result<Self, VaultError> {
        Self::from_slice(&decode_base64("nonce", value)?)
    }

    pub fn as_bytes(&self) -> &[u8; NONCE_LEN] {
        &self.0
    }

    pub fn to_base64(&self) -> String {
        encode_base64(&self.0)
    }
}

/// Key-derivation parameters, persisted with the salt when the vault is born.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KdfParams {
    /// PBKDF2-HMAC-SHA256 iteration count.
    pub iterations: u32,
}

impl KdfParams {
    pub fn new(iterations: u32) -> Result<Self, VaultError> {
        let params = Self { iterations };
        params.validate()?;
        Ok(params)
    }

    /// The cheapest parameters still accepted by [`KdfParams::validate`].
    pub const fn minimum() -> Self {
        Self {
            iterations: MIN_KDF_ITERATIONS,
        }
    }

    pub fn validate(&self) -> Result<(), VaultError> {
        if self.iterations < MIN_KDF_ITERATIONS {
            return Err(VaultError::InvalidInput(format!(
                "KDF iteration count must be at least {MIN_KDF_ITERATIONS}, got {}",
                self.iterations
            )));
        }
        Ok(())
    }
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_KDF_ITERATIONS,
        }
    }
}

/// The immutable part of a vault, written once at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VaultHeader {
    pub salt: Salt,
    pub kdf: KdfParams,
}

/// The editable fields of a record as supplied by the caller.
///
/// The vault assigns the id and timestamps. Sensitive fields are zeroed on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct RecordDraft {
    pub title: String,
    pub username: Option<String>,
    pub secret: String,
    pub url: Option<String>,
    pub notes: Option<String>,
}

impl RecordDraft {
    pub fn new(title: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            username: None,
            secret: secret.into(),
            url: None,
            notes: None,
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Reject drafts missing a required field.
    pub fn validate(&self) -> Result<(), VaultError> {
        if self.title.trim().is_empty() {
            return Err(VaultError::InvalidInput("title must not be empty".to_string()));
        }
        if self.secret.is_empty() {
            return Err(VaultError::InvalidInput("secret must not be empty".to_string()));
        }
        Ok(())
    }
}

impl fmt::Debug for RecordDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordDraft")
            .field("title", &self.title)
            .field("username", &self.username)
            .field("secret", &"[REDACTED]")
            .field("url", &self.url)
            .field("notes", &self.notes.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// A decrypted record. Exists only in memory and is never persisted.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct PlaintextRecord {
    #[zeroize(skip)]
    pub id: RecordId,
    pub title: String,
    pub username: Option<String>,
    pub secret: String,
    pub url: Option<String>,
    pub notes: Option<String>,
    #[zeroize(skip)]
    pub created_at: DateTime<Utc>,
    #[zeroize(skip)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl PlaintextRecord {
    /// Materialize a draft under the given identity and timestamps.
    pub fn from_draft(
        id: RecordId,
        draft: &RecordDraft,
        created_at: DateTime<Utc>,
        updated_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            title: draft.title.clone(),
            username: draft.username.clone(),
            secret: draft.secret.clone(),
            url: draft.url.clone(),
            notes: draft.notes.clone(),
            created_at,
            updated_at,
        }
    }
}

impl fmt::Debug for PlaintextRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaintextRecord")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("username", &self.username)
            .field("secret", &"[REDACTED]")
            .field("url", &self.url)
            .field("notes", &self.notes.as_ref().map(|_| "[REDACTED]"))
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// The persisted form of a record.
///
/// `secret` and `notes` hold base64 of `ciphertext || tag`. They stay as
/// strings until decryption, so bad base64 or a tampered ciphertext only
/// costs that one record at load time. A record that is structurally broken
/// (a missing `nonce`, a non-integer `createdAt`) fails the whole load with
/// [`VaultError::Storage`] instead, and nothing is rewritten over it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedRecord {
    pub id: RecordId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub secret: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Nonce used for `secret`.
    pub nonce: String,
    /// Nonce used for `notes`; present iff `notes` is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes_nonce: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_milliseconds_option"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

/// The whole vault as one serializable document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salt: Option<Salt>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kdf: Option<KdfParams>,
    #[serde(default)]
    pub records: Vec<EncryptedRecord>,
}

impl VaultDocument {
    /// A freshly created vault: header set, no records.
    pub fn born(header: &VaultHeader) -> Self {
        Self {
            salt: Some(header.salt),
            kdf: Some(header.kdf),
            records: Vec::new(),
        }
    }
}
