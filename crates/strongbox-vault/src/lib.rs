// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The cryptographic core of the Strongbox credential vault.
//!
//! A master passphrase and a per-vault salt are stretched with
//! PBKDF2-HMAC-SHA256 into an AES-256-GCM key. Each record's secret and
//! notes are sealed under that key with fresh nonces. No verifier is ever
//! stored: unlocking trial-decrypts the first record.

pub mod cipher;
pub mod crypto;
pub mod generator;
pub mod kdf;
pub mod key;
pub mod policy;
pub mod prompt;
pub mod session;
pub mod vault;
pub mod verify;

pub use cipher::{decrypt_all, decrypt_field, decrypt_record, encrypt_field, encrypt_record};
pub use generator::generate_password;
pub use kdf::{derive_key, derive_key_async, generate_salt};
pub use key::MasterKey;
pub use policy::validate_master_passphrase;
pub use prompt::{get_passphrase, get_passphrase_with_confirm};
pub use session::{Session, mask_secret};
pub use vault::VaultCore;
pub use verify::{Verification, check_key, verify_passphrase};
