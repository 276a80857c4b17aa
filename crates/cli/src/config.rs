// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Subsystem configuration.
//!
//! Configuration is stored in `config.toml` inside the state directory and includes:
//! - `storage_key`: the persistence key the queue blob is stored under
//! - `max_retry_attempts` / `retry_delay_ms`: the retry policy for drain passes
//! - `drain_on_start`: whether `init` drains a non-empty queue when already online
//! - `probe`: optional TCP reachability probe used as the connectivity signal

use serde::{Deserialize, Serialize};
use std::fs;
use std::net::ToSocketAddrs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::env;
use crate::error::{Error, Result};
use crate::network::ProbeSignal;
use crate::scheduler::{RetryPolicy, MAX_RETRY_ATTEMPTS, RETRY_DELAY};

const CONFIG_FILE_NAME: &str = "config.toml";
const STATE_DIR_NAME: &str = "requeue";

/// Default persistence key for the queue blob.
pub const DEFAULT_STORAGE_KEY: &str = "offline_queue";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    /// Failed attempts after which a queued request is dropped.
    #[serde(default = "default_max_retry_attempts")]
    pub max_retry_attempts: u32,
    /// Pause after each failed attempt during a drain pass.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    #[serde(default)]
    pub drain_on_start: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probe: Option<ProbeConfig>,
}

/// Reachability probe: the device counts as online while a TCP connection
/// to `address` succeeds within `timeout_ms`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// `host:port` to connect to.
    pub address: String,
    #[serde(default = "default_probe_interval_ms")]
    pub interval_ms: u64,
    #[serde(default = "default_probe_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_max_retry_attempts() -> u32 {
    MAX_RETRY_ATTEMPTS
}

fn default_retry_delay_ms() -> u64 {
    RETRY_DELAY.as_millis() as u64
}

fn default_probe_interval_ms() -> u64 {
    5000
}

fn default_probe_timeout_ms() -> u64 {
    2000
}

impl Default for Config {
    fn default() -> Self {
        Config {
            storage_key: default_storage_key(),
            max_retry_attempts: default_max_retry_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
            drain_on_start: false,
            probe: None,
        }
    }
}

impl ProbeConfig {
    pub fn new(address: impl Into<String>) -> Self {
        ProbeConfig {
            address: address.into(),
            interval_ms: default_probe_interval_ms(),
            timeout_ms: default_probe_timeout_ms(),
        }
    }

    /// Returns an error message if the address is not `host:port`.
    pub fn validate_address(&self) -> Option<String> {
        let Some((host, port)) = self.address.rsplit_once(':') else {
            return Some(format!("probe address '{}' must be host:port", self.address));
        };
        if host.is_empty() {
            return Some(format!("probe address '{}' has no host", self.address));
        }
        if port.parse::<u16>().is_err() {
            return Some(format!("probe address '{}' has an invalid port", self.address));
        }
        None
    }
}

impl Config {
    /// Path of the config file inside `state_dir`.
    pub fn path(state_dir: &Path) -> PathBuf {
        state_dir.join(CONFIG_FILE_NAME)
    }

    /// Load configuration from `state_dir`. A missing file yields the defaults.
    pub fn load(state_dir: &Path) -> Result<Self> {
        let config_path = Self::path(state_dir);
        if !config_path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(&config_path)
            .map_err(|e| Error::Config(format!("failed to read config: {}", e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to `state_dir`, creating it if needed.
    pub fn save(&self, state_dir: &Path) -> Result<()> {
        fs::create_dir_all(state_dir)?;
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
        fs::write(Self::path(state_dir), content)?;
        Ok(())
    }

    /// Rejects values the subsystem cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.storage_key.is_empty() {
            return Err(Error::InvalidConfig("storage_key must not be empty".to_string()));
        }
        rq_core::store::validate_key(&self.storage_key)
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        if self.max_retry_attempts == 0 {
            return Err(Error::InvalidConfig("max_retry_attempts must be at least 1".to_string()));
        }
        if let Some(probe) = &self.probe {
            if let Some(msg) = probe.validate_address() {
                return Err(Error::InvalidConfig(msg));
            }
            if probe.interval_ms == 0 {
                return Err(Error::InvalidConfig("probe.interval_ms must be at least 1".to_string()));
            }
            if probe.timeout_ms == 0 {
                return Err(Error::InvalidConfig("probe.timeout_ms must be at least 1".to_string()));
            }
        }
        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_retry_attempts,
            delay: Duration::from_millis(self.retry_delay_ms),
        }
    }

    /// Builds the probe signal if one is configured.
    pub fn probe_signal(&self) -> Option<ProbeSignal> {
        self.probe.as_ref().map(|p| {
            ProbeSignal::new(
                p.address.clone(),
                Duration::from_millis(p.interval_ms),
                Duration::from_millis(p.timeout_ms),
            )
        })
    }
}

/// Checks that a probe address resolves. Used by `config show` to hint at typos.
pub fn probe_resolves(address: &str) -> bool {
    address.to_socket_addrs().map(|mut a| a.next().is_some()).unwrap_or(false)
}

/// Resolve the state directory.
///
/// Precedence: explicit path, `REQUEUE_STATE_DIR`, `$XDG_STATE_HOME/requeue`,
/// then `~/.local/state/requeue`.
pub fn resolve_state_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    if let Some(path) = env::state_dir() {
        return Ok(path);
    }
    if let Some(xdg) = env::xdg_state_home() {
        return Ok(xdg.join(STATE_DIR_NAME));
    }
    dirs::home_dir()
        .map(|home| home.join(".local/state").join(STATE_DIR_NAME))
        .ok_or(Error::NoStateDir)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
