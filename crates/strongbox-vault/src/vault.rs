// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vault lifecycle: create, unlock, add, update, load, delete, export and erase.
//!
//! [`VaultCore`] never holds the master key. Create and unlock hand it to
//! the caller; every record operation borrows it for the duration of the
//! call only.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, SubsecRound, Utc};
use secrecy::SecretString;
use strongbox_core::{
    EncryptedRecord, KdfParams, PlaintextRecord, RecordDraft, RecordId, VaultDocument,
    VaultError, VaultHeader, VaultStore,
};
use tracing::{debug, info, warn};

use crate::cipher;
use crate::kdf;
use crate::key::MasterKey;
use crate::verify::{self, Verification};

/// Timestamps are persisted with millisecond precision; truncate up front so
/// an in-memory record compares equal to its reloaded copy.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// The vault core, generic over its persistence backend.
pub struct VaultCore<S> {
    store: S,
    kdf: KdfParams,
}

impl<S: VaultStore> VaultCore<S> {
    /// `kdf` applies to vaults created through this core. Existing vaults
    /// always unlock with the parameters stored in their header.
    pub fn new(store: S, kdf: KdfParams) -> Self {
        Self { store, kdf }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Whether a vault has been created in the backing store.
    pub fn exists(&self) -> Result<bool, VaultError> {
        Ok(self.store.get_salt()?.is_some())
    }

    /// Create a new, empty vault and return its key.
    ///
    /// Fails with [`VaultError::VaultExists`] if the store already holds a
    /// salt. The key is derived before anything is written, so a failed
    /// derivation leaves the store untouched.
    pub async fn create_vault(&self, passphrase: &SecretString) -> Result<MasterKey, VaultError> {
        if self.exists()? {
            return Err(VaultError::VaultExists);
        }

        let header = VaultHeader {
            salt: kdf::generate_salt()?,
            kdf: self.kdf,
        };
        let key = kdf::derive_key_async(passphrase, header.salt, header.kdf).await?;
        self.store.initialize(&header)?;

        info!(
            backend = self.store.name(),
            iterations = header.kdf.iterations,
            "vault created"
        );
        Ok(key)
    }

    /// Derive the key for an existing vault and verify it.
    ///
    /// A wrong passphrase is [`VaultError::Authentication`] and changes
    /// nothing. An empty vault cannot be verified and is unlocked with a
    /// warning.
    pub async fn unlock_vault(&self, passphrase: &SecretString) -> Result<MasterKey, VaultError> {
        let salt = self.store.get_salt()?.ok_or(VaultError::NoVault)?;
        let params = match self.store.get_kdf_params()? {
            Some(params) => params,
            None => {
                warn!(
                    iterations = self.kdf.iterations,
                    "vault header has no KDF parameters; using configured values"
                );
                self.kdf
            }
        };

        let key = kdf::derive_key_async(passphrase, salt, params).await?;
        let records = self.store.get_records()?;

        match verify::check_key(&key, &records) {
            Verification::Verified => {
                info!(backend = self.store.name(), "vault unlocked");
                Ok(key)
            }
            Verification::Unverifiable => {
                warn!("vault has no records; passphrase accepted without verification");
                Ok(key)
            }
            Verification::Rejected => {
                debug!("unlock rejected");
                Err(VaultError::Authentication)
            }
        }
    }

    /// Encrypt a new record, append it and persist the array.
    pub fn add_record(
        &self,
        draft: &RecordDraft,
        key: &MasterKey,
    ) -> Result<EncryptedRecord, VaultError> {
        draft.validate()?;

        let record = PlaintextRecord::from_draft(RecordId::generate(), draft, now(), None);
        let encrypted = cipher::encrypt_record(&record, key)?;

        let mut records = self.store.get_records()?;
        records.push(encrypted.clone());
        self.store.set_records(&records)?;

        debug!(record_id = %encrypted.id, "record added");
        Ok(encrypted)
    }

    /// Re-encrypt a record with new contents under fresh nonces.
    ///
    /// Keeps `created_at` and position; sets `updated_at`.
    pub fn update_record(
        &self,
        id: &RecordId,
        draft: &RecordDraft,
        key: &MasterKey,
    ) -> Result<EncryptedRecord, VaultError> {
        draft.validate()?;

        let mut records = self.store.get_records()?;
        let slot = records
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| VaultError::NotFound(id.clone()))?;

        let record = PlaintextRecord::from_draft(id.clone(), draft, slot.created_at, Some(now()));
        let encrypted = cipher::encrypt_record(&record, key)?;
        *slot = encrypted.clone();
        self.store.set_records(&records)?;

        debug!(record_id = %id, "record updated");
        Ok(encrypted)
    }

    /// Remove a record.
    pub fn delete_record(&self, id: &RecordId) -> Result<(), VaultError> {
        let mut records = self.store.get_records()?;
        let before = records.len();
        records.retain(|r| &r.id != id);
        if records.len() == before {
            return Err(VaultError::NotFound(id.clone()));
        }
        self.store.set_records(&records)?;

        debug!(record_id = %id, "record deleted");
        Ok(())
    }

    /// The stored records, still encrypted.
    pub fn records(&self) -> Result<Vec<EncryptedRecord>, VaultError> {
        self.store.get_records()
    }

    /// Decrypt whatever can be decrypted; see [`cipher::decrypt_all`].
    pub fn decrypt_all(&self, records: &[EncryptedRecord], key: &MasterKey) -> Vec<PlaintextRecord> {
        cipher::decrypt_all(records, key)
    }

    /// Load and decrypt every readable record.
    pub fn load_records(&self, key: &MasterKey) -> Result<Vec<PlaintextRecord>, VaultError> {
        let records = self.store.get_records()?;
        Ok(cipher::decrypt_all(&records, key))
    }

    /// Load and decrypt a single record. Unlike bulk loading, a record that
    /// fails to decrypt is an error here.
    pub fn get_record(&self, id: &RecordId, key: &MasterKey) -> Result<PlaintextRecord, VaultError> {
        let records = self.store.get_records()?;
        let record = records
            .iter()
            .find(|r| &r.id == id)
            .ok_or_else(|| VaultError::NotFound(id.clone()))?;
        cipher::decrypt_record(record, key)
    }

    /// Write the encrypted vault to `path` as a JSON document in the
    /// persisted layout. Refuses to overwrite an existing file. Returns the
    /// number of records exported.
    pub fn export_backup(&self, path: &Path) -> Result<usize, VaultError> {
        let salt = self.store.get_salt()?.ok_or(VaultError::NoVault)?;
        let document = VaultDocument {
            salt: Some(salt),
            kdf: Some(self.store.get_kdf_params()?.unwrap_or(self.kdf)),
            records: self.store.get_records()?,
        };
        let json = serde_json::to_vec_pretty(&document)?;

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::AlreadyExists => VaultError::InvalidInput(format!(
                    "refusing to overwrite existing file {}",
                    path.display()
                )),
                _ => VaultError::Storage {
                    source: Box::new(e),
                },
            })?;
        file.write_all(&json)
            .and_then(|()| file.sync_all())
            .map_err(|e| VaultError::Storage {
                source: Box::new(e),
            })?;

        info!(path = %path.display(), records = document.records.len(), "vault exported");
        Ok(document.records.len())
    }

    /// Permanently remove the vault. Without the passphrase there is no way
    /// back.
    pub fn erase_vault(&self) -> Result<(), VaultError> {
        self.store.erase()?;
        info!(backend = self.store.name(), "vault erased");
        Ok(())
    }
}

impl<S> std::fmt::Debug for VaultCore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultCore")
            .field("kdf", &self.kdf)
            .finish_non_exhaustive()
    }
}
