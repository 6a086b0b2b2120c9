// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence trait for the vault header and the encrypted record array.

use std::sync::Arc;

use crate::error::VaultError;
use crate::types::{EncryptedRecord, KdfParams, Salt, VaultHeader};

/// Blocking key/value persistence for a single vault.
///
/// Every call is atomic: a records array is either fully written or not at
/// all. Implementations use interior mutability so a store can be shared
/// between the vault core and its callers.
pub trait VaultStore: Send + Sync {
    /// Human-readable backend name, used in log output.
    fn name(&self) -> &str;

    /// The vault salt, or `None` when no vault has been created.
    fn get_salt(&self) -> Result<Option<Salt>, VaultError>;

    /// Overwrite the salt. Only the birth of a vault should ever call this.
    fn set_salt(&self, salt: Salt) -> Result<(), VaultError>;

    /// The KDF parameters recorded at creation, if any.
    fn get_kdf_params(&self) -> Result<Option<KdfParams>, VaultError>;

    /// All encrypted records in insertion order. Empty if none.
    fn get_records(&self) -> Result<Vec<EncryptedRecord>, VaultError>;

    /// Replace the records array. Fails with [`VaultError::QuotaExceeded`]
    /// when the medium is full, leaving the previous array in place.
    fn set_records(&self, records: &[EncryptedRecord]) -> Result<(), VaultError>;

    /// Write the birth state of a vault (salt, KDF parameters, empty records)
    /// in one atomic step.
    fn initialize(&self, header: &VaultHeader) -> Result<(), VaultError>;

    /// Remove every piece of persisted vault state.
    fn erase(&self) -> Result<(), VaultError>;
}

impl<T: VaultStore + ?Sized> VaultStore for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn get_salt(&self) -> Result<Option<Salt>, VaultError> {
        (**self).get_salt()
    }

    fn set_salt(&self, salt: Salt) -> Result<(), VaultError> {
        (**self).set_salt(salt)
    }

    fn get_kdf_params(&self) -> Result<Option<KdfParams>, VaultError> {
        (**self).get_kdf_params()
    }

    fn get_records(&self) -> Result<Vec<EncryptedRecord>, VaultError> {
        (**self).get_records()
    }

    fn set_records(&self, records: &[EncryptedRecord]) -> Result<(), VaultError> {
        (**self).set_records(records)
    }

    fn initialize(&self, header: &VaultHeader) -> Result<(), VaultError> {
        (**self).initialize(header)
    }

    fn erase(&self) -> Result<(), VaultError> {
        (**self).erase()
    }
}

impl<T: VaultStore + ?Sized> VaultStore for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn get_salt(&self) -> Result<Option<Salt>, VaultError> {
        (**self).get_salt()
    }

    fn set_salt(&self, salt: Salt) -> Result<(), VaultError> {
        (**self).set_salt(salt)
    }

    fn get_kdf_params(&self) -> Result<Option<KdfParams>, VaultError> {
        (**self).get_kdf_params()
    }

    fn get_records(&self) -> Result<Vec<EncryptedRecord>, VaultError> {
        (**self).get_records()
    }

    fn set_records(&self, records: &[EncryptedRecord]) -> Result<(), VaultError> {
        (**self).set_records(records)
    }

    fn initialize(&self, header: &VaultHeader) -> Result<(), VaultError> {
        (**self).initialize(header)
    }

    fn erase(&self) -> Result<(), VaultError> {
        (**self).erase()
    }
}
