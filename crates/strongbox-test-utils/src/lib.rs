// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Strongbox integration tests.
//!
//! - [`TestVault`] - a created vault over a memory or file store, optionally seeded
//! - [`fixtures`] - passphrases, fast KDF parameters, sample drafts and a
//!   ciphertext corruption helper

pub mod fixtures;
pub mod harness;

pub use fixtures::{
    CORRECT_PASSPHRASE, WRONG_PASSPHRASE, corrupt_secret, fast_kdf, passphrase, sample_draft,
};
pub use harness::{TestVault, TestVaultBuilder};

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn builder_seeds_requested_records() {
        let vault = TestVault::builder().with_records(3).build().await.unwrap();
        assert_eq!(vault.seeded.len(), 3);
        assert_eq!(vault.core.records().unwrap(), vault.seeded);
    }

    #[test]
    fn corrupt_secret_changes_ciphertext() {
        let mut record = strongbox_core::EncryptedRecord {
            id: strongbox_core::RecordId::from("x"),
            title: "t".to_string(),
            username: None,
            secret: strongbox_core::types::encode_base64(b"abcdef"),
            notes: None,
            nonce: strongbox_core::types::encode_base64(&[0u8; 12]),
            notes_nonce: None,
            url: None,
            created_at: Default::default(),
            updated_at: None,
        };
        let before = record.secret.clone();
        corrupt_secret(&mut record);
        assert_ne!(record.secret, before);
    }
}
