// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Strongbox configuration system.

use strongbox_config::diagnostic::{ConfigError, closest_key};
use strongbox_config::model::{StorageBackend, StrongboxConfig};
use strongbox_config::{load_and_validate_path, load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_strongbox_config() {
    let toml = r#"
[vault]
kdf_iterations = 200000

[storage]
backend = "file"
path = "/tmp/strongbox-test.json"

[session]
idle_timeout_secs = 60

[generator]
length = 32
symbols = false

[log]
level = "debug"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.vault.kdf_iterations, 200_000);
    assert_eq!(config.storage.backend, StorageBackend::File);
    assert_eq!(config.storage.path, "/tmp/strongbox-test.json");
    assert_eq!(config.session.idle_timeout_secs, 60);
    assert_eq!(config.generator.length, 32);
    assert!(!config.generator.symbols);
    assert!(config.generator.digits);
    assert_eq!(config.log.level, "debug");
}

/// An empty file yields the compiled defaults.
#[test]
fn empty_toml_yields_defaults() {
    let config = load_config_from_str("").expect("empty config is valid");
    let defaults = StrongboxConfig::default();
    assert_eq!(config.vault.kdf_iterations, defaults.vault.kdf_iterations);
    assert_eq!(config.storage.backend, StorageBackend::Sqlite);
    assert_eq!(config.session.idle_timeout_secs, 300);
    assert_eq!(config.generator.length, 20);
    assert_eq!(config.log.level, "warn");
}

/// Unknown field in [vault] produces an error naming the bad key.
#[test]
fn unknown_field_in_vault_produces_error() {
    let toml = r#"
[vault]
kdf_iteratons = 100000
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("kdf_iteratons"),
        "error should mention unknown field or the bad key, got: {err_str}"
    );
}

/// Unknown key is turned into a diagnostic with a suggestion.
#[test]
fn unknown_key_diagnostic_suggests_correction() {
    let toml = r#"
[session]
idle_timout_secs = 30
"#;

    let errors = load_and_validate_str(toml).expect_err("should fail");
    let unknown = errors
        .iter()
        .find_map(|e| match e {
            ConfigError::UnknownKey {
                key, suggestion, ..
            } => Some((key.clone(), suggestion.clone())),
            _ => None,
        })
        .expect("an UnknownKey diagnostic");
    assert_eq!(unknown.0, "idle_timout_secs");
    assert_eq!(unknown.1.as_deref(), Some("idle_timeout_secs"));
}

/// Unknown backend names are reported against `storage.backend`.
#[test]
fn unknown_backend_is_a_bad_value() {
    let toml = r#"
[storage]
backend = "cloud"
"#;
    assert!(load_config_from_str(toml).is_err());

    let errors = load_and_validate_str(toml).expect_err("should fail");
    match &errors[..] {
        [ConfigError::BadValue { key, detail, .. }] => {
            assert_eq!(key, "storage.backend");
            assert!(detail.contains("cloud"), "got: {detail}");
        }
        other => panic!("unexpected diagnostics: {other:?}"),
    }
}

/// A misspelled section is pointed at in the source.
#[test]
fn misspelled_section_gets_span_and_suggestion() {
    let toml = "[strorage]\nbackend = \"file\"\n";

    let errors = load_and_validate_str(toml).expect_err("should fail");
    let (section, key, suggestion, span) = errors
        .iter()
        .find_map(|e| match e {
            ConfigError::UnknownKey {
                section,
                key,
                suggestion,
                span,
                ..
            } => Some((section.clone(), key.clone(), suggestion.clone(), *span)),
            _ => None,
        })
        .expect("an UnknownKey diagnostic");
    assert!(section.is_none());
    assert_eq!(key, "strorage");
    assert_eq!(suggestion.as_deref(), Some("storage"));
    let span = span.expect("span into the inline source");
    assert_eq!(&toml[span.offset()..span.offset() + span.len()], "strorage");
}

/// Values below the KDF floor pass deserialization but fail validation.
#[test]
fn weak_kdf_fails_validation() {
    let toml = r#"
[vault]
kdf_iterations = 1000
"#;

    assert!(load_config_from_str(toml).is_ok());
    let errors = load_and_validate_str(toml).expect_err("should fail validation");
    assert!(errors.iter().any(
        |e| matches!(e, ConfigError::Validation { message } if message.contains("kdf_iterations"))
    ));
}

#[test]
fn memory_backend_validates_without_path() {
    let toml = r#"
[storage]
backend = "memory"
path = ""
"#;
    let config = load_and_validate_str(toml).expect("memory backend needs no path");
    assert_eq!(config.storage.backend, StorageBackend::Memory);
}

#[test]
fn explicit_path_is_loaded_and_validated() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("custom.toml");
    std::fs::write(&path, "[generator]\nlength = 12\n").unwrap();

    let config = load_and_validate_path(&path).expect("valid file");
    assert_eq!(config.generator.length, 12);
}

#[test]
fn closest_key_matches_backend_typo() {
    assert_eq!(closest_key("backnd", &["backend", "path"]), Some("backend"));
}
