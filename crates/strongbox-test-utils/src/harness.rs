// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A ready-made vault for integration tests.
//!
//! `TestVault` creates a vault with fast KDF parameters over either an
//! in-memory store or a JSON file in a temp directory, optionally seeded
//! with records.

use std::sync::Arc;

use strongbox_core::{EncryptedRecord, VaultError, VaultStore};
use strongbox_storage::{FileStore, MemoryStore};
use strongbox_vault::{MasterKey, VaultCore};
use tempfile::TempDir;

use crate::fixtures::{CORRECT_PASSPHRASE, fast_kdf, passphrase, sample_draft};

/// Builder for [`TestVault`].
pub struct TestVaultBuilder {
    passphrase: String,
    records: usize,
    on_disk: bool,
}

impl TestVaultBuilder {
    fn new() -> Self {
        Self {
            passphrase: CORRECT_PASSPHRASE.to_string(),
            records: 0,
            on_disk: false,
        }
    }

    pub fn with_passphrase(mut self, passphrase: &str) -> Self {
        self.passphrase = passphrase.to_string();
        self
    }

    /// Seed `count` records built from [`sample_draft`].
    pub fn with_records(mut self, count: usize) -> Self {
        self.records = count;
        self
    }

    /// Persist to a JSON file in a temp directory instead of memory.
    pub fn on_disk(mut self) -> Self {
        self.on_disk = true;
        self
    }

    pub async fn build(self) -> Result<TestVault, VaultError> {
        let (store, dir): (Arc<dyn VaultStore>, Option<TempDir>) = if self.on_disk {
            let dir = TempDir::new().map_err(|e| VaultError::Storage { source: e.into() })?;
            let store: Arc<dyn VaultStore> = Arc::new(FileStore::new(dir.path().join("vault.json")));
            (store, Some(dir))
        } else {
            let store: Arc<dyn VaultStore> = Arc::new(MemoryStore::new());
            (store, None)
        };

        let core = VaultCore::new(Arc::clone(&store), fast_kdf());
        let key = core.create_vault(&passphrase(&self.passphrase)).await?;

        let mut seeded = Vec::with_capacity(self.records);
        for n in 0..self.records {
            seeded.push(core.add_record(&sample_draft(n), &key)?);
        }

        Ok(TestVault {
            core,
            store,
            key,
            seeded,
            _dir: dir,
        })
    }
}

/// A created, unlocked vault and everything a test needs to poke at it.
pub struct TestVault {
    pub core: VaultCore<Arc<dyn VaultStore>>,
    pub store: Arc<dyn VaultStore>,
    pub key: MasterKey,
    /// Records added at build time, in insertion order.
    pub seeded: Vec<EncryptedRecord>,
    _dir: Option<TempDir>,
}

impl TestVault {
    pub fn builder() -> TestVaultBuilder {
        TestVaultBuilder::new()
    }

    /// A second core over the same store, as a restarted process would see it.
    pub fn reopen(&self) -> VaultCore<Arc<dyn VaultStore>> {
        VaultCore::new(Arc::clone(&self.store), fast_kdf())
    }
}
