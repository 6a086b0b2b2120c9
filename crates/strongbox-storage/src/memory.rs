// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-process store. Nothing survives the process.

use std::sync::{Mutex, MutexGuard};

use strongbox_core::{
    EncryptedRecord, KdfParams, Salt, VaultDocument, VaultError, VaultHeader, VaultStore,
};

/// A [`VaultStore`] backed by process memory.
///
/// An optional byte quota, measured on the serialized document, makes
/// [`VaultError::QuotaExceeded`] reproducible without filling a disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    document: Mutex<VaultDocument>,
    quota_bytes: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that refuses writes whose serialized size exceeds `bytes`.
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            document: Mutex::default(),
            quota_bytes: Some(bytes),
        }
    }

    /// A copy of everything currently stored.
    pub fn snapshot(&self) -> Result<VaultDocument, VaultError> {
        Ok(self.lock()?.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, VaultDocument>, VaultError> {
        self.document
            .lock()
            .map_err(|_| VaultError::Internal("memory store lock poisoned".to_string()))
    }

    fn check_quota(&self, candidate: &VaultDocument) -> Result<(), VaultError> {
        if let Some(quota) = self.quota_bytes {
            let size = serde_json::to_vec(candidate)?.len();
            if size > quota {
                return Err(VaultError::QuotaExceeded);
            }
        }
        Ok(())
    }
}

impl VaultStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn get_salt(&self) -> Result<Option<Salt>, VaultError> {
        Ok(self.lock()?.salt)
    }

    fn set_salt(&self, salt: Salt) -> Result<(), VaultError> {
        self.lock()?.salt = Some(salt);
        Ok(())
    }

    fn get_kdf_params(&self) -> Result<Option<KdfParams>, VaultError> {
        Ok(self.lock()?.kdf)
    }

    fn get_records(&self) -> Result<Vec<EncryptedRecord>, VaultError> {
        Ok(self.lock()?.records.clone())
    }

    fn set_records(&self, records: &[EncryptedRecord]) -> Result<(), VaultError> {
        let mut document = self.lock()?;
        let candidate = VaultDocument {
            salt: document.salt,
            kdf: document.kdf,
            records: records.to_vec(),
        };
        self.check_quota(&candidate)?;
        *document = candidate;
        Ok(())
    }

    fn initialize(&self, header: &VaultHeader) -> Result<(), VaultError> {
        *self.lock()? = VaultDocument::born(header);
        Ok(())
    }

    fn erase(&self) -> Result<(), VaultError> {
        *self.lock()? = VaultDocument::default();
        Ok(())
    }
}
