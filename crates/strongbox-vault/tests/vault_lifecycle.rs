// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end vault lifecycle over real stores.

use std::sync::Arc;

use strongbox_core::{RecordDraft, RecordId, VaultError, VaultStore};
use strongbox_storage::{FileStore, MemoryStore, SqliteStore};
use strongbox_test_utils::{
    CORRECT_PASSPHRASE, TestVault, WRONG_PASSPHRASE, corrupt_secret, fast_kdf, passphrase,
    sample_draft,
};
use strongbox_vault::{Session, VaultCore};

#[tokio::test]
async fn create_then_unlock_after_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vault.db");
    let path = path.to_str().unwrap();

    {
        let core = VaultCore::new(SqliteStore::open(path).unwrap(), fast_kdf());
        let key = core.create_vault(&passphrase("Abcdef12!")).await.unwrap();
        core.add_record(&RecordDraft::new("Example", "s3cr3t!"), &key)
            .unwrap();
    }

    // Fresh process: new store handle, new core, no key in memory.
    let core = VaultCore::new(SqliteStore::open(path).unwrap(), fast_kdf());
    assert!(core.exists().unwrap());
    let key = core.unlock_vault(&passphrase("Abcdef12!")).await.unwrap();
    let records = core.load_records(&key).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].title, "Example");
    assert_eq!(records[0].secret, "s3cr3t!");
}

#[tokio::test]
async fn add_persist_reload_decrypt_via_file_store() {
    let vault = TestVault::builder().on_disk().build().await.unwrap();
    let added = vault
        .core
        .add_record(
            &RecordDraft::new("Example", "s3cr3t!").with_url("https://example.com"),
            &vault.key,
        )
        .unwrap();
    assert_ne!(added.secret, "s3cr3t!");

    let reopened = vault.reopen();
    let key = reopened
        .unlock_vault(&passphrase(CORRECT_PASSPHRASE))
        .await
        .unwrap();
    let records = reopened.load_records(&key).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, added.id);
    assert_eq!(records[0].secret, "s3cr3t!");
    assert_eq!(records[0].url.as_deref(), Some("https://example.com"));
    assert_eq!(records[0].created_at, added.created_at);
}

#[tokio::test]
async fn wrong_passphrase_is_authentication_error_and_changes_nothing() {
    let vault = TestVault::builder().with_records(2).build().await.unwrap();
    let before = vault.store.get_records().unwrap();

    let err = vault
        .reopen()
        .unlock_vault(&passphrase(WRONG_PASSPHRASE))
        .await
        .unwrap_err();
    assert!(matches!(err, VaultError::Authentication));
    assert_eq!(vault.store.get_records().unwrap(), before);
}

#[tokio::test]
async fn empty_vault_unlocks_without_verification() {
    let vault = TestVault::builder().build().await.unwrap();
    // Nothing to verify against, so any non-empty passphrase is accepted.
    assert!(
        vault
            .reopen()
            .unlock_vault(&passphrase(WRONG_PASSPHRASE))
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn create_refuses_existing_vault() {
    let vault = TestVault::builder().with_records(1).build().await.unwrap();
    let err = vault
        .core
        .create_vault(&passphrase("Another1!"))
        .await
        .unwrap_err();
    assert!(matches!(err, VaultError::VaultExists));
    assert_eq!(vault.store.get_records().unwrap().len(), 1);
}

#[tokio::test]
async fn unlock_without_vault_is_no_vault() {
    let core = VaultCore::new(MemoryStore::new(), fast_kdf());
    let err = core
        .unlock_vault(&passphrase(CORRECT_PASSPHRASE))
        .await
        .unwrap_err();
    assert!(matches!(err, VaultError::NoVault));
}

#[tokio::test]
async fn failed_creation_writes_nothing() {
    let store = Arc::new(MemoryStore::new());
    let core = VaultCore::new(Arc::clone(&store), fast_kdf());
    let err = core.create_vault(&passphrase("")).await.unwrap_err();
    assert!(matches!(err, VaultError::InvalidInput(_)));
    assert!(store.get_salt().unwrap().is_none());
}

#[tokio::test]
async fn creation_persists_salt_and_params_together() {
    let store = Arc::new(MemoryStore::new());
    let core = VaultCore::new(Arc::clone(&store), fast_kdf());
    core.create_vault(&passphrase(CORRECT_PASSPHRASE))
        .await
        .unwrap();

    let doc = store.snapshot().unwrap();
    assert!(doc.salt.is_some());
    assert_eq!(doc.kdf, Some(fast_kdf()));
    assert!(doc.records.is_empty());
}

#[tokio::test]
async fn partial_corruption_skips_only_the_bad_record() {
    let vault = TestVault::builder().with_records(5).build().await.unwrap();
    let mut records = vault.store.get_records().unwrap();
    corrupt_secret(&mut records[2]);
    vault.store.set_records(&records).unwrap();

    let loaded = vault.core.load_records(&vault.key).unwrap();
    assert_eq!(loaded.len(), 4);
    assert!(loaded.iter().all(|r| r.id != records[2].id));
    assert_eq!(loaded[2].id, records[3].id);
}

#[tokio::test]
async fn corrupted_first_record_rejects_the_correct_passphrase() {
    let vault = TestVault::builder().with_records(3).build().await.unwrap();
    let mut records = vault.store.get_records().unwrap();
    corrupt_secret(&mut records[0]);
    vault.store.set_records(&records).unwrap();

    // The first record is the verifier, so its loss reads as a wrong passphrase.
    let err = vault
        .reopen()
        .unlock_vault(&passphrase(CORRECT_PASSPHRASE))
        .await
        .unwrap_err();
    assert!(matches!(err, VaultError::Authentication));
    assert_eq!(vault.store.get_records().unwrap(), records);
}

#[tokio::test]
async fn update_keeps_identity_and_rotates_nonces() {
    let vault = TestVault::builder().with_records(2).build().await.unwrap();
    let original = vault.seeded[1].clone();

    let updated = vault
        .core
        .update_record(
            &original.id,
            &RecordDraft::new("Renamed", "n3w-s3cr3t!"),
            &vault.key,
        )
        .unwrap();

    assert_eq!(updated.id, original.id);
    assert_eq!(updated.created_at, original.created_at);
    assert!(updated.updated_at.is_some());
    assert_ne!(updated.nonce, original.nonce);
    assert!(updated.notes.is_none());

    let stored = vault.store.get_records().unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[1], updated);

    let plain = vault.core.get_record(&original.id, &vault.key).unwrap();
    assert_eq!(plain.title, "Renamed");
    assert_eq!(plain.secret, "n3w-s3cr3t!");
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let vault = TestVault::builder().with_records(1).build().await.unwrap();
    let missing = RecordId::from("no-such-record");

    let err = vault
        .core
        .update_record(&missing, &sample_draft(9), &vault.key)
        .unwrap_err();
    assert!(matches!(err, VaultError::NotFound(ref id) if *id == missing));
    assert!(matches!(
        vault.core.delete_record(&missing),
        Err(VaultError::NotFound(_))
    ));
    assert!(matches!(
        vault.core.get_record(&missing, &vault.key),
        Err(VaultError::NotFound(_))
    ));
    assert_eq!(vault.store.get_records().unwrap().len(), 1);
}

#[tokio::test]
async fn delete_removes_only_the_target() {
    let vault = TestVault::builder().with_records(3).build().await.unwrap();
    vault.core.delete_record(&vault.seeded[0].id).unwrap();

    let ids: Vec<_> = vault
        .store
        .get_records()
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(ids, vec![vault.seeded[1].id.clone(), vault.seeded[2].id.clone()]);
}

#[tokio::test]
async fn invalid_draft_is_rejected_before_writing() {
    let vault = TestVault::builder().build().await.unwrap();
    let err = vault
        .core
        .add_record(&RecordDraft::new("  ", "x"), &vault.key)
        .unwrap_err();
    assert!(matches!(err, VaultError::InvalidInput(_)));
    assert!(vault.store.get_records().unwrap().is_empty());
}

#[tokio::test]
async fn quota_exceeded_surfaces_and_keeps_prior_state() {
    let store = Arc::new(MemoryStore::with_quota(1_500));
    let core = VaultCore::new(Arc::clone(&store), fast_kdf());
    let key = core
        .create_vault(&passphrase(CORRECT_PASSPHRASE))
        .await
        .unwrap();
    core.add_record(&RecordDraft::new("small", "x1!"), &key)
        .unwrap();

    let big = "x".repeat(4_096);
    let err = core
        .add_record(&RecordDraft::new("big", big), &key)
        .unwrap_err();
    assert!(matches!(err, VaultError::QuotaExceeded));
    assert_eq!(store.get_records().unwrap().len(), 1);
}

#[tokio::test]
async fn export_backup_writes_encrypted_layout_once() {
    let vault = TestVault::builder().with_records(2).build().await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("backup.json");

    assert_eq!(vault.core.export_backup(&path).unwrap(), 2);
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(!text.contains("s3cr3t-0!"));
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["records"].as_array().unwrap().len(), 2);
    assert!(value["salt"].is_string());

    // Backups are never overwritten.
    assert!(matches!(
        vault.core.export_backup(&path),
        Err(VaultError::InvalidInput(_))
    ));

    // The backup is itself a valid file store for the same passphrase.
    let restored = VaultCore::new(FileStore::new(&path), fast_kdf());
    let key = restored
        .unlock_vault(&passphrase(CORRECT_PASSPHRASE))
        .await
        .unwrap();
    assert_eq!(restored.load_records(&key).unwrap().len(), 2);
}

#[tokio::test]
async fn erase_removes_everything() {
    let vault = TestVault::builder().with_records(2).on_disk().build().await.unwrap();
    vault.core.erase_vault().unwrap();
    assert!(!vault.core.exists().unwrap());
    assert!(vault.store.get_records().unwrap().is_empty());
    assert!(matches!(
        vault
            .reopen()
            .unlock_vault(&passphrase(CORRECT_PASSPHRASE))
            .await,
        Err(VaultError::NoVault)
    ));
}

#[tokio::test]
async fn session_gates_record_operations() {
    let vault = TestVault::builder().build().await.unwrap();
    let key = vault
        .reopen()
        .unlock_vault(&passphrase(CORRECT_PASSPHRASE))
        .await
        .unwrap();

    let mut session = Session::new(std::time::Duration::from_secs(60));
    session.unlock(key);
    vault
        .core
        .add_record(&sample_draft(0), session.key().unwrap())
        .unwrap();

    session.lock();
    assert!(matches!(session.key(), Err(VaultError::NotAuthenticated)));
}
