// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Small building blocks shared by integration tests.

use secrecy::SecretString;
use strongbox_core::types::{decode_base64, encode_base64};
use strongbox_core::{EncryptedRecord, KdfParams, RecordDraft};

/// The passphrase most tests create their vault with.
pub const CORRECT_PASSPHRASE: &str = "CorrectHorse1!";

/// A passphrase that never opens a vault created with [`CORRECT_PASSPHRASE`].
pub const WRONG_PASSPHRASE: &str = "WrongPhrase2@";

/// The cheapest KDF parameters the vault accepts.
pub fn fast_kdf() -> KdfParams {
    KdfParams::minimum()
}

pub fn passphrase(value: &str) -> SecretString {
    SecretString::from(value.to_string())
}

/// A distinct, fully populated draft for index `n`.
pub fn sample_draft(n: usize) -> RecordDraft {
    RecordDraft::new(format!("Account {n}"), format!("s3cr3t-{n}!"))
        .with_username(format!("user{n}"))
        .with_url(format!("https://site{n}.example.com"))
        .with_notes(format!("notes for account {n}"))
}

/// Flip one bit of a record's secret ciphertext, keeping it valid base64.
pub fn corrupt_secret(record: &mut EncryptedRecord) {
    let mut bytes = match decode_base64("secret", &record.secret) {
        Ok(bytes) => bytes,
        Err(_) => return,
    };
    if let Some(first) = bytes.first_mut() {
        *first ^= 0x01;
    }
    record.secret = encode_base64(&bytes);
}
