// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Unlocked-session state: the one place the master key lives between calls.

use std::time::{Duration, Instant};

use strongbox_core::VaultError;
use tracing::{debug, info};

use crate::key::MasterKey;

/// Holds the master key while the vault is unlocked.
///
/// The key is forgotten on [`Session::lock`] or after `idle_timeout` without
/// a key access. Expiry is checked lazily on the next access.
#[derive(Debug)]
pub struct Session {
    key: Option<MasterKey>,
    idle_timeout: Duration,
    last_activity: Instant,
}

impl Session {
    /// A locked session.
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            key: None,
            idle_timeout,
            last_activity: Instant::now(),
        }
    }

    pub fn unlock(&mut self, key: MasterKey) {
        self.key = Some(key);
        self.last_activity = Instant::now();
        debug!(idle_timeout_secs = self.idle_timeout.as_secs(), "session unlocked");
    }

    /// Drop the key. Dropping zeroes it.
    pub fn lock(&mut self) {
        if self.key.take().is_some() {
            info!("session locked");
        }
    }

    fn expired(&self) -> bool {
        self.last_activity.elapsed() >= self.idle_timeout
    }

    /// Whether a key access would currently succeed.
    pub fn is_unlocked(&self) -> bool {
        self.key.is_some() && !self.expired()
    }

    /// Time left before the idle timeout, or `None` when locked.
    pub fn remaining(&self) -> Option<Duration> {
        if !self.is_unlocked() {
            return None;
        }
        Some(self.idle_timeout.saturating_sub(self.last_activity.elapsed()))
    }

    /// Borrow the key and reset the idle timer.
    ///
    /// Fails with [`VaultError::NotAuthenticated`] when locked or expired; an
    /// expired key is dropped before returning.
    pub fn key(&mut self) -> Result<&MasterKey, VaultError> {
        if self.key.is_some() && self.expired() {
            self.key = None;
            info!("session expired after idle timeout");
        }

        match self.key.as_ref() {
            Some(key) => {
                self.last_activity = Instant::now();
                Ok(key)
            }
            None => Err(VaultError::NotAuthenticated),
        }
    }
}

/// Mask a secret for display: first and last four characters around `...`.
///
/// Values shorter than 10 characters are fully masked as `****`.
pub fn mask_secret(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() < 10 {
        return "****".to_string();
    }
    let prefix: String = chars[..4].iter().collect();
    let suffix: String = chars[chars.len() - 4..].iter().collect();
    format!("{prefix}...{suffix}")
}
