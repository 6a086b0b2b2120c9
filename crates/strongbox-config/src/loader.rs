// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./strongbox.toml` > `~/.config/strongbox/strongbox.toml`
//! > `/etc/strongbox/strongbox.toml` with environment variable overrides via
//! the `STRONGBOX_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use tracing::debug;

use crate::model::StrongboxConfig;

/// Environment variables under the `STRONGBOX_` prefix that are not config keys.
const NON_CONFIG_ENV_KEYS: &[&str] = &["passphrase"];

/// Path of the system-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/strongbox/strongbox.toml";

/// File name looked up in the working directory and the XDG config dir.
pub const CONFIG_FILE_NAME: &str = "strongbox.toml";

/// Path of the per-user config file, if a config dir is known.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("strongbox").join(CONFIG_FILE_NAME))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/strongbox/strongbox.toml` (system-wide)
/// 3. `~/.config/strongbox/strongbox.toml` (user XDG config)
/// 4. `./strongbox.toml` (local directory)
/// 5. `STRONGBOX_*` environment variables
pub fn load_config() -> Result<StrongboxConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<StrongboxConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(StrongboxConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<StrongboxConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(StrongboxConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Candidate config files in merge order: system, user, working directory.
pub fn config_files() -> Vec<PathBuf> {
    let mut files = vec![PathBuf::from(SYSTEM_CONFIG_PATH)];
    files.extend(user_config_path());
    files.push(
        std::env::current_dir()
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .unwrap_or_else(|_| PathBuf::from(CONFIG_FILE_NAME)),
    );
    files
}

/// Build the Figment used internally for config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    let mut figment = Figment::new().merge(Serialized::defaults(StrongboxConfig::default()));
    for path in config_files() {
        if path.is_file() {
            debug!(path = %path.display(), "merging config file");
        }
        figment = figment.merge(Toml::file(path));
    }
    figment.merge(env_provider())
}

/// Environment overrides under `STRONGBOX_`.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `STRONGBOX_SESSION_IDLE_TIMEOUT_SECS` must map to
/// `session.idle_timeout_secs`, not `session.idle.timeout.secs`. Figment
/// hands the key over with its original case, so it is lowercased first.
fn env_provider() -> Env {
    Env::prefixed("STRONGBOX_")
        .ignore(NON_CONFIG_ENV_KEYS)
        .map(|key| section_key(key.as_str()).into())
}

/// `SESSION_IDLE_TIMEOUT_SECS` -> `session.idle_timeout_secs`.
fn section_key(env_key: &str) -> String {
    let key = env_key.to_ascii_lowercase();
    for (section, _) in crate::diagnostic::SCHEMA {
        if let Some(rest) = key.strip_prefix(*section).and_then(|r| r.strip_prefix('_')) {
            debug!(variable = env_key, "config override from environment");
            return format!("{section}.{rest}");
        }
    }
    key
}
