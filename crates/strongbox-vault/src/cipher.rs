// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Field- and record-level encryption.
//!
//! Each sensitive field gets its own fresh nonce and is bound to its record
//! id and field name through the AEAD associated data, so a ciphertext moved
//! to another record or field fails authentication.

use strongbox_core::types::{decode_base64, encode_base64};
use strongbox_core::{EncryptedRecord, Nonce, PlaintextRecord, RecordId, VaultError};
use tracing::warn;
use zeroize::Zeroizing;

use crate::crypto;
use crate::key::MasterKey;

const SECRET_FIELD: &str = "secret";
const NOTES_FIELD: &str = "notes";

fn field_aad(id: &RecordId, field: &str) -> Vec<u8> {
    format!("strongbox:v1:{id}:{field}").into_bytes()
}

fn utf8(bytes: Zeroizing<Vec<u8>>) -> Result<Zeroizing<String>, VaultError> {
    match std::str::from_utf8(&bytes) {
        Ok(s) => Ok(Zeroizing::new(s.to_owned())),
        Err(_) => Err(VaultError::InvalidInput(
            "decrypted field is not valid UTF-8".to_string(),
        )),
    }
}

/// Encrypt a standalone string. Returns `(ciphertext || tag, nonce)`.
pub fn encrypt_field(plaintext: &str, key: &MasterKey) -> Result<(Vec<u8>, Nonce), VaultError> {
    crypto::seal(key, plaintext.as_bytes(), &[])
}

/// Decrypt a value produced by [`encrypt_field`].
pub fn decrypt_field(
    ciphertext: &[u8],
    key: &MasterKey,
    nonce: &Nonce,
) -> Result<Zeroizing<String>, VaultError> {
    utf8(crypto::open(key, nonce, ciphertext, &[])?)
}

fn seal_bound(
    id: &RecordId,
    field: &str,
    plaintext: &str,
    key: &MasterKey,
) -> Result<(String, String), VaultError> {
    let (ciphertext, nonce) = crypto::seal(key, plaintext.as_bytes(), &field_aad(id, field))?;
    Ok((encode_base64(&ciphertext), nonce.to_base64()))
}

fn open_bound(
    id: &RecordId,
    field: &str,
    ciphertext_b64: &str,
    nonce_b64: &str,
    key: &MasterKey,
) -> Result<Zeroizing<String>, VaultError> {
    let nonce = Nonce::from_base64(nonce_b64)?;
    let ciphertext = decode_base64(field, ciphertext_b64)?;
    utf8(crypto::open(key, &nonce, &ciphertext, &field_aad(id, field))?)
}

/// Encrypt the sensitive fields of a record.
///
/// `secret` and `notes` are sealed under independent nonces. Everything else
/// is copied in clear.
pub fn encrypt_record(record: &PlaintextRecord, key: &MasterKey) -> Result<EncryptedRecord, VaultError> {
    let (secret, nonce) = seal_bound(&record.id, SECRET_FIELD, &record.secret, key)?;

    let (notes, notes_nonce) = match &record.notes {
        Some(notes) => {
            let (ct, n) = seal_bound(&record.id, NOTES_FIELD, notes, key)?;
            (Some(ct), Some(n))
        }
        None => (None, None),
    };

    Ok(EncryptedRecord {
        id: record.id.clone(),
        title: record.title.clone(),
        username: record.username.clone(),
        secret,
        notes,
        nonce,
        notes_nonce,
        url: record.url.clone(),
        created_at: record.created_at,
        updated_at: record.updated_at,
    })
}

/// Decrypt only the secret field of a stored record.
pub fn open_secret(record: &EncryptedRecord, key: &MasterKey) -> Result<Zeroizing<String>, VaultError> {
    open_bound(&record.id, SECRET_FIELD, &record.secret, &record.nonce, key)
}

/// Decrypt a stored record.
///
/// Tag failures are [`VaultError::Decryption`]; malformed base64, a nonce of
/// the wrong length or notes without a notes nonce are
/// [`VaultError::InvalidInput`].
pub fn decrypt_record(record: &EncryptedRecord, key: &MasterKey) -> Result<PlaintextRecord, VaultError> {
    let secret = open_secret(record, key)?;

    let notes = match (&record.notes, &record.notes_nonce) {
        (Some(ct), Some(nonce)) => Some(open_bound(&record.id, NOTES_FIELD, ct, nonce, key)?),
        (None, _) => None,
        (Some(_), None) => {
            return Err(VaultError::InvalidInput(format!(
                "record {} has notes but no notesNonce",
                record.id
            )));
        }
    };

    Ok(PlaintextRecord {
        id: record.id.clone(),
        title: record.title.clone(),
        username: record.username.clone(),
        secret: secret.as_str().to_owned(),
        url: record.url.clone(),
        notes: notes.map(|n| n.as_str().to_owned()),
        created_at: record.created_at,
        updated_at: record.updated_at,
    })
}

/// Decrypt every record that can be decrypted.
///
/// A record that fails is skipped and logged by id; it never aborts the
/// load. Output order follows input order.
pub fn decrypt_all(records: &[EncryptedRecord], key: &MasterKey) -> Vec<PlaintextRecord> {
    records
        .iter()
        .filter_map(|record| match decrypt_record(record, key) {
            Ok(plaintext) => Some(plaintext),
            Err(e) => {
                warn!(record_id = %record.id, error = %e, "skipping record that failed to decrypt");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};
    use strongbox_core::RecordDraft;
    use tracing_test::traced_test;

    use super::*;

    fn created() -> DateTime<Utc> {
        DateTime::from_timestamp_millis(1_700_000_000_000).unwrap()
    }

    fn sample(id: &str, notes: Option<&str>) -> PlaintextRecord {
        let mut draft = RecordDraft::new("Example", "s3cr3t!").with_username("alice");
        if let Some(n) = notes {
            draft = draft.with_notes(n);
        }
        PlaintextRecord::from_draft(RecordId::from(id), &draft, created(), None)
    }

    #[test]
    fn field_roundtrip() {
        let key = MasterKey::generate().unwrap();
        let (ct, nonce) = encrypt_field("hunter2", &key).unwrap();
        assert_eq!(decrypt_field(&ct, &key, &nonce).unwrap().as_str(), "hunter2");
    }

    #[test]
    fn record_roundtrip_with_notes() {
        let key = MasterKey::generate().unwrap();
        let record = sample("r1", Some("recovery codes: 1234"));
        let encrypted = encrypt_record(&record, &key).unwrap();

        assert_ne!(encrypted.secret, "s3cr3t!");
        assert_eq!(encrypted.title, "Example");
        assert_eq!(encrypted.username.as_deref(), Some("alice"));
        assert!(encrypted.notes_nonce.is_some());
        assert_ne!(encrypted.notes_nonce.as_deref(), Some(encrypted.nonce.as_str()));

        let decrypted = decrypt_record(&encrypted, &key).unwrap();
        assert_eq!(decrypted, record);
    }

    #[test]
    fn record_without_notes_has_no_notes_nonce() {
        let key = MasterKey::generate().unwrap();
        let encrypted = encrypt_record(&sample("r1", None), &key).unwrap();
        assert!(encrypted.notes.is_none());
        assert!(encrypted.notes_nonce.is_none());
    }

    #[test]
    fn secret_moved_between_records_is_rejected() {
        let key = MasterKey::generate().unwrap();
        let a = encrypt_record(&sample("a", None), &key).unwrap();
        let mut b = encrypt_record(&sample("b", None), &key).unwrap();
        b.secret = a.secret.clone();
        b.nonce = a.nonce.clone();
        assert!(matches!(decrypt_record(&b, &key), Err(VaultError::Decryption)));
    }

    #[test]
    fn secret_moved_into_notes_is_rejected() {
        let key = MasterKey::generate().unwrap();
        let mut record = encrypt_record(&sample("a", Some("n")), &key).unwrap();
        record.notes = Some(record.secret.clone());
        record.notes_nonce = Some(record.nonce.clone());
        assert!(matches!(
            decrypt_record(&record, &key),
            Err(VaultError::Decryption)
        ));
    }

    #[test]
    fn malformed_nonce_is_invalid_input() {
        let key = MasterKey::generate().unwrap();
        let mut record = encrypt_record(&sample("a", None), &key).unwrap();
        record.nonce = encode_base64(&[0u8; 8]);
        assert!(matches!(
            decrypt_record(&record, &key),
            Err(VaultError::InvalidInput(_))
        ));
    }

    #[test]
    fn notes_without_nonce_is_invalid_input() {
        let key = MasterKey::generate().unwrap();
        let mut record = encrypt_record(&sample("a", Some("n")), &key).unwrap();
        record.notes_nonce = None;
        assert!(matches!(
            decrypt_record(&record, &key),
            Err(VaultError::InvalidInput(_))
        ));
    }

    #[test]
    #[traced_test]
    fn decrypt_all_skips_failures_and_keeps_order() {
        let key = MasterKey::generate().unwrap();
        let mut records: Vec<_> = ["a", "b", "c"]
            .iter()
            .map(|id| encrypt_record(&sample(id, None), &key).unwrap())
            .collect();
        records[1].secret = "!!not base64!!".to_string();

        let out = decrypt_all(&records, &key);
        let ids: Vec<_> = out.iter().map(|r| r.id.as_str().to_string()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert!(logs_contain("skipping record that failed to decrypt"));
        assert!(!logs_contain("s3cr3t!"));
    }
}
