// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Strongbox credential vault.
//!
//! This crate provides the error taxonomy, the record data contracts, the
//! persisted vault layout, and the [`VaultStore`] trait that storage backends
//! implement. It contains no cryptography; see `strongbox-vault` for that.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::VaultError;
pub use traits::VaultStore;
pub use types::{
    EncryptedRecord, KdfParams, Nonce, PlaintextRecord, RecordDraft, RecordId, Salt,
    VaultDocument, VaultHeader, NONCE_LEN, SALT_LEN,
};
