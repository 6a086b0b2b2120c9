// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Single-file JSON store.
//!
//! The file holds exactly the persisted vault layout. Every write goes to a
//! temporary file in the same directory which is then renamed over the
//! original, so readers see either the old document or the new one.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use strongbox_core::{
    EncryptedRecord, KdfParams, Salt, VaultDocument, VaultError, VaultHeader, VaultStore,
};
use tracing::debug;

/// A [`VaultStore`] persisted as one JSON document.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

/// Map an I/O failure, recognizing a full medium.
pub(crate) fn map_io_err(e: io::Error) -> VaultError {
    match e.kind() {
        io::ErrorKind::StorageFull | io::ErrorKind::FileTooLarge => VaultError::QuotaExceeded,
        _ => VaultError::Storage {
            source: Box::new(e),
        },
    }
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<VaultDocument, VaultError> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(VaultDocument::default()),
            Err(e) => Err(map_io_err(e)),
        }
    }

    fn write(&self, document: &VaultDocument) -> Result<(), VaultError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(map_io_err)?;

        let json = serde_json::to_vec_pretty(document)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(map_io_err)?;
        tmp.write_all(&json).map_err(map_io_err)?;
        tmp.as_file().sync_all().map_err(map_io_err)?;
        tmp.persist(&self.path).map_err(|e| map_io_err(e.error))?;

        debug!(path = %self.path.display(), bytes = json.len(), "vault file written");
        Ok(())
    }

    /// Read, modify and write back under the write lock.
    fn update(&self, f: impl FnOnce(&mut VaultDocument)) -> Result<(), VaultError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| VaultError::Internal("file store lock poisoned".to_string()))?;
        let mut document = self.read()?;
        f(&mut document);
        self.write(&document)
    }
}

impl VaultStore for FileStore {
    fn name(&self) -> &str {
        "file"
    }

    fn get_salt(&self) -> Result<Option<Salt>, VaultError> {
        Ok(self.read()?.salt)
    }

    fn set_salt(&self, salt: Salt) -> Result<(), VaultError> {
        self.update(|doc| doc.salt = Some(salt))
    }

    fn get_kdf_params(&self) -> Result<Option<KdfParams>, VaultError> {
        Ok(self.read()?.kdf)
    }

    fn get_records(&self) -> Result<Vec<EncryptedRecord>, VaultError> {
        Ok(self.read()?.records)
    }

    fn set_records(&self, records: &[EncryptedRecord]) -> Result<(), VaultError> {
        self.update(|doc| doc.records = records.to_vec())
    }

    fn initialize(&self, header: &VaultHeader) -> Result<(), VaultError> {
        self.update(|doc| *doc = VaultDocument::born(header))
    }

    fn erase(&self) -> Result<(), VaultError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(map_io_err(e)),
        }
    }
}
