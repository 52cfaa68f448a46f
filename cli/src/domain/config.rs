//! Domain types and validators for wslhub configuration.
//!
//! Pure functions only: no I/O, no async, no filesystem access.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

// ── Constants ────────────────────────────────────────────────────────────────

pub const VALID_CONFIG_KEYS: &[&str] = &[
    "install.root",
    "memory.limit_gb",
    "timings.settle_secs",
    "timings.restart_settle_secs",
    "timings.stop_timeout_secs",
    "timings.command_timeout_secs",
];

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.wslhub/config.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WslHubConfig {
    pub install: InstallConfig,
    pub memory: MemoryConfig,
    pub timings: Timings,
}

/// Where new distributions land when `--path` is not given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct InstallConfig {
    /// Parent directory; each distribution gets `<root>/<name>`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
}

/// Memory ceiling reported as the total in metrics snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    pub limit_gb: u32,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self { limit_gb: 8 }
    }
}

/// Delays and bounds for the lifecycle pipelines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    /// Pause before import and after user configuration.
    pub settle_secs: u64,
    /// Pause after restarting a migrated distribution.
    pub restart_settle_secs: u64,
    pub stop_poll_initial_ms: u64,
    pub stop_poll_max_ms: u64,
    /// Overall bound on waiting for a distribution to stop.
    pub stop_timeout_secs: u64,
    /// Per-invocation bound on `wsl.exe`. Imports of large images are slow.
    pub command_timeout_secs: u64,
    /// Gap between the two `/proc/stat` samples.
    pub cpu_sample_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            settle_secs: 2,
            restart_settle_secs: 10,
            stop_poll_initial_ms: 2_000,
            stop_poll_max_ms: 10_000,
            stop_timeout_secs: 300,
            command_timeout_secs: 1_800,
            cpu_sample_ms: 1_000,
        }
    }
}

impl Timings {
    #[must_use]
    pub fn settle(&self) -> Duration {
        Duration::from_secs(self.settle_secs)
    }

    #[must_use]
    pub fn restart_settle(&self) -> Duration {
        Duration::from_secs(self.restart_settle_secs)
    }

    #[must_use]
    pub fn stop_timeout(&self) -> Duration {
        Duration::from_secs(self.stop_timeout_secs)
    }

    #[must_use]
    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }

    #[must_use]
    pub fn cpu_sample_gap(&self) -> Duration {
        Duration::from_millis(self.cpu_sample_ms)
    }

    /// Poll interval sequence: initial, ×1.5 per step, capped.
    #[must_use]
    pub fn backoff(&self) -> Backoff {
        Backoff {
            next_ms: self.stop_poll_initial_ms,
            max_ms: self.stop_poll_max_ms,
        }
    }

    /// Zero delays and short bounds for tests.
    #[must_use]
    pub fn immediate() -> Self {
        Self {
            settle_secs: 0,
            restart_settle_secs: 0,
            stop_poll_initial_ms: 1,
            stop_poll_max_ms: 5,
            stop_timeout_secs: 1,
            command_timeout_secs: 5,
            cpu_sample_ms: 0,
        }
    }
}

/// Infinite iterator of poll intervals.
#[derive(Debug, Clone)]
pub struct Backoff {
    next_ms: u64,
    max_ms: u64,
}

impl Iterator for Backoff {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        let current = self.next_ms.min(self.max_ms);
        self.next_ms = (current.saturating_mul(3) / 2).max(current.saturating_add(1));
        Some(Duration::from_millis(current))
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a configuration key against the whitelist.
///
/// # Errors
///
/// Returns an error if the key is not in the allowed list.
pub fn validate_config_key(key: &str) -> Result<()> {
    if !VALID_CONFIG_KEYS.contains(&key) {
        return Err(ConfigError::UnknownKey {
            key: key.to_string(),
            valid: VALID_CONFIG_KEYS.join(", "),
        }
        .into());
    }
    Ok(())
}

/// Validates a configuration value for the given key.
///
/// # Errors
///
/// Returns an error if the value is not valid for the key.
pub fn validate_config_value(key: &str, value: &str) -> Result<()> {
    let invalid = |expected: &str| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        expected: expected.to_string(),
    };
    match key {
        "install.root" => {
            if value.trim().is_empty() {
                return Err(invalid("Expected a directory path").into());
            }
        }
        "memory.limit_gb" => match value.parse::<u32>() {
            Ok(n) if n > 0 => {}
            _ => return Err(invalid("Expected a whole number of gigabytes, at least 1").into()),
        },
        "timings.stop_timeout_secs" | "timings.command_timeout_secs" => match value.parse::<u64>() {
            Ok(n) if n > 0 => {}
            _ => return Err(invalid("Expected a whole number of seconds, at least 1").into()),
        },
        "timings.settle_secs" | "timings.restart_settle_secs" => {
            if value.parse::<u64>().is_err() {
                return Err(invalid("Expected a whole number of seconds").into());
            }
        }
        _ => {}
    }
    Ok(())
}

/// Validate `key`/`value` and write the value into `config`.
///
/// # Errors
///
/// Returns an error if the key or value is rejected.
pub fn apply_config_value(config: &mut WslHubConfig, key: &str, value: &str) -> Result<()> {
    validate_config_key(key)?;
    validate_config_value(key, value)?;
    // Values are validated above; parse failures are unreachable.
    let secs = || value.parse::<u64>().unwrap_or_default();
    match key {
        "install.root" => config.install.root = Some(PathBuf::from(value.trim())),
        "memory.limit_gb" => config.memory.limit_gb = value.parse().unwrap_or(config.memory.limit_gb),
        "timings.settle_secs" => config.timings.settle_secs = secs(),
        "timings.restart_settle_secs" => config.timings.restart_settle_secs = secs(),
        "timings.stop_timeout_secs" => config.timings.stop_timeout_secs = secs(),
        "timings.command_timeout_secs" => config.timings.command_timeout_secs = secs(),
        _ => {}
    }
    Ok(())
}

/// Flatten `config` into `(key, value)` pairs in whitelist order.
#[must_use]
pub fn config_entries(config: &WslHubConfig) -> Vec<(&'static str, String)> {
    VALID_CONFIG_KEYS
        .iter()
        .map(|key| {
            let value = match *key {
                "install.root" => config
                    .install
                    .root
                    .as_ref()
                    .map_or_else(|| "(unset)".to_string(), |p| p.display().to_string()),
                "memory.limit_gb" => config.memory.limit_gb.to_string(),
                "timings.settle_secs" => config.timings.settle_secs.to_string(),
                "timings.restart_settle_secs" => config.timings.restart_settle_secs.to_string(),
                "timings.stop_timeout_secs" => config.timings.stop_timeout_secs.to_string(),
                _ => config.timings.command_timeout_secs.to_string(),
            };
            (*key, value)
        })
        .collect()
}

// ── Unit tests ───────────────────────────────────────────────────────────────
