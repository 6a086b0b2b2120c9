// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Strongbox settings: `[vault]`, `[storage]`, `[session]`, `[generator]`
//! and `[log]`, layered from TOML files and `STRONGBOX_*` variables.
//!
//! Every entry point returns either a validated [`StrongboxConfig`] or the
//! full list of problems as [`ConfigError`] diagnostics.

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::{ConfigError, ConfigSource, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{StorageBackend, StorageConfig, StrongboxConfig};

use std::path::Path;

/// Load from the standard locations and environment, then validate.
pub fn load_and_validate() -> Result<StrongboxConfig, Vec<ConfigError>> {
    checked(loader::load_config(), || {
        loader::config_files()
            .iter()
            .filter_map(|path| ConfigSource::read(path))
            .collect()
    })
}

/// Load from a TOML string alone, then validate.
pub fn load_and_validate_str(toml_content: &str) -> Result<StrongboxConfig, Vec<ConfigError>> {
    checked(loader::load_config_from_str(toml_content), || {
        vec![ConfigSource::inline(toml_content)]
    })
}

/// Load from an explicit file plus environment, then validate.
pub fn load_and_validate_path(path: &Path) -> Result<StrongboxConfig, Vec<ConfigError>> {
    checked(loader::load_config_from_path(path), || {
        ConfigSource::read(path).into_iter().collect()
    })
}

/// Sources are only read back when there is an error to point into.
fn checked(
    loaded: Result<StrongboxConfig, figment::Error>,
    sources: impl FnOnce() -> Vec<ConfigSource>,
) -> Result<StrongboxConfig, Vec<ConfigError>> {
    let config = loaded.map_err(|err| diagnostic::from_figment(err, &sources()))?;
    validation::validate_config(&config)?;
    Ok(config)
}
