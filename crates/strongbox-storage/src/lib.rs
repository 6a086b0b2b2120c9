// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence backends for the Strongbox vault.
//!
//! Three [`VaultStore`] implementations: [`MemoryStore`] (process memory),
//! [`FileStore`] (one JSON document in the persisted vault layout) and
//! [`SqliteStore`] (WAL-mode SQLite with embedded migrations).

pub mod file;
pub mod memory;
pub mod migrations;
pub mod sqlite;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use strongbox_config::model::{StorageBackend, StorageConfig};
use strongbox_core::{VaultError, VaultStore};
use tracing::debug;

/// Open the store selected by the configuration.
pub fn open_store(config: &StorageConfig) -> Result<Box<dyn VaultStore>, VaultError> {
    debug!(backend = %config.backend, path = %config.path, "opening vault store");
    Ok(match config.backend {
        StorageBackend::Memory => Box::new(MemoryStore::new()),
        StorageBackend::File => Box::new(FileStore::new(&config.path)),
        StorageBackend::Sqlite => Box::new(SqliteStore::open(&config.path)?),
    })
}
