// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite store with WAL mode and embedded migrations.
//!
//! The header lives in `vault_meta`, records in `vault_records` ordered by
//! position. Replacing the record array is a single transaction.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, OptionalExtension, params};
use strongbox_core::{
    EncryptedRecord, KdfParams, Salt, VaultError, VaultHeader, VaultStore,
};
use tracing::debug;

use crate::migrations;

const META_SALT: &str = "salt";
const META_KDF: &str = "kdf";

/// Convert rusqlite errors, recognizing a full database.
pub(crate) fn map_sql_err(e: rusqlite::Error) -> VaultError {
    match e {
        rusqlite::Error::SqliteFailure(ref err, _) if err.code == rusqlite::ErrorCode::DiskFull => {
            VaultError::QuotaExceeded
        }
        other => VaultError::Storage {
            source: Box::new(other),
        },
    }
}

/// A [`VaultStore`] persisted in a SQLite database.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    path: String,
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore").field("path", &self.path).finish()
    }
}

impl SqliteStore {
    /// Open (creating if needed) the database at `path` and run migrations.
    pub fn open(path: &str) -> Result<Self, VaultError> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(crate::file::map_io_err)?;
            }
        }

        let mut conn = Connection::open(path).map_err(map_sql_err)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .map_err(map_sql_err)?;
        migrations::run_migrations(&mut conn)?;

        debug!(path, "sqlite vault store opened");
        Ok(Self {
            conn: Mutex::new(conn),
            path: path.to_string(),
        })
    }

    /// An in-memory database, mostly for tests.
    pub fn open_in_memory() -> Result<Self, VaultError> {
        let mut conn = Connection::open_in_memory().map_err(map_sql_err)?;
        migrations::run_migrations(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            path: ":memory:".to_string(),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Cap the database at `pages` pages. SQLite never lowers the cap below
    /// the current size; writes that would grow past it fail with
    /// [`VaultError::QuotaExceeded`].
    pub fn limit_pages(&self, pages: u32) -> Result<(), VaultError> {
        self.conn()?
            .execute_batch(&format!("PRAGMA max_page_count = {pages};"))
            .map_err(map_sql_err)
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, VaultError> {
        self.conn
            .lock()
            .map_err(|_| VaultError::Internal("sqlite store lock poisoned".to_string()))
    }

    fn get_meta(&self, key: &str) -> Result<Option<String>, VaultError> {
        self.conn()?
            .query_row(
                "SELECT value FROM vault_meta WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(map_sql_err)
    }
}

impl VaultStore for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn get_salt(&self) -> Result<Option<Salt>, VaultError> {
        self.get_meta(META_SALT)?
            .map(|encoded| Salt::from_base64(&encoded))
            .transpose()
    }

    fn set_salt(&self, salt: Salt) -> Result<(), VaultError> {
        self.conn()?
            .execute(
                "INSERT OR REPLACE INTO vault_meta (key, value) VALUES (?1, ?2)",
                params![META_SALT, salt.to_base64()],
            )
            .map_err(map_sql_err)?;
        Ok(())
    }

    fn get_kdf_params(&self) -> Result<Option<KdfParams>, VaultError> {
        match self.get_meta(META_KDF)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    fn get_records(&self) -> Result<Vec<EncryptedRecord>, VaultError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare("SELECT body FROM vault_records ORDER BY position")
            .map_err(map_sql_err)?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(map_sql_err)?;

        let mut records = Vec::new();
        for row in rows {
            let body = row.map_err(map_sql_err)?;
            records.push(serde_json::from_str(&body)?);
        }
        Ok(records)
    }

    fn set_records(&self, records: &[EncryptedRecord]) -> Result<(), VaultError> {
        let bodies = records
            .iter()
            .map(|r| serde_json::to_string(r).map(|body| (r.id.as_str(), body)))
            .collect::<Result<Vec<_>, _>>()?;

        let mut conn = self.conn()?;
        let tx = conn.transaction().map_err(map_sql_err)?;
        tx.execute("DELETE FROM vault_records", [])
            .map_err(map_sql_err)?;
        {
            let mut stmt = tx
                .prepare("INSERT INTO vault_records (position, id, body) VALUES (?1, ?2, ?3)")
                .map_err(map_sql_err)?;
            for (position, (id, body)) in bodies.iter().enumerate() {
                stmt.execute(params![position as i64, id, body])
                    .map_err(map_sql_err)?;
            }
        }
        tx.commit().map_err(map_sql_err)?;

        debug!(count = records.len(), "records written");
        Ok(())
    }

    fn initialize(&self, header: &VaultHeader) -> Result<(), VaultError> {
        let kdf = serde_json::to_string(&header.kdf)?;

        let mut conn = self.conn()?;
        let tx = conn.transaction().map_err(map_sql_err)?;
        tx.execute_batch("DELETE FROM vault_records; DELETE FROM vault_meta;")
            .map_err(map_sql_err)?;
        tx.execute(
            "INSERT INTO vault_meta (key, value) VALUES (?1, ?2)",
            params![META_SALT, header.salt.to_base64()],
        )
        .map_err(map_sql_err)?;
        tx.execute(
            "INSERT INTO vault_meta (key, value) VALUES (?1, ?2)",
            params![META_KDF, kdf],
        )
        .map_err(map_sql_err)?;
        tx.commit().map_err(map_sql_err)
    }

    fn erase(&self) -> Result<(), VaultError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction().map_err(map_sql_err)?;
        tx.execute_batch("DELETE FROM vault_records; DELETE FROM vault_meta;")
            .map_err(map_sql_err)?;
        tx.commit().map_err(map_sql_err)?;
        conn.execute_batch("VACUUM;").map_err(map_sql_err)
    }
}
