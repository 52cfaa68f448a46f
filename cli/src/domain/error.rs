//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::classify::Outcome;

// ── Distribution errors ───────────────────────────────────────────────────────

/// Everything that can end a distribution operation.
///
/// Variants that originate from `wsl.exe` carry the sanitized tool output so
/// the caller can show it verbatim.
#[derive(Debug, Error)]
pub enum DistroError {
    #[error("failed to spawn wsl.exe for '{action}': {source}")]
    ProcessSpawn {
        action: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("wsl.exe '{action}' failed ({status}): {output}")]
    ProcessExecution {
        action: &'static str,
        status: String,
        output: String,
    },

    #[error("wsl.exe '{action}' timed out after {secs}s")]
    ProcessTimeout { action: &'static str, secs: u64 },

    #[error("{outcome}: {output}")]
    Classified { outcome: Outcome, output: String },

    #[error("download failed: {0}")]
    Network(String),

    #[error("SHA-256 mismatch for {name}: expected {expected}, got {actual}. The image was deleted; retry the install.")]
    Integrity {
        name: String,
        expected: String,
        actual: String,
    },

    #[error("registry lookup failed: {0}")]
    RegistryLookup(String),

    #[error("distribution '{0}' was not found in the registry")]
    NotRegistered(String),

    #[error("{context} {}: {source}", path.display())]
    Filesystem {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unregistered action: {0}")]
    UnregisteredAction(String),

    #[error("timed out after {secs}s waiting for '{name}' to {what}")]
    Timeout {
        name: String,
        what: &'static str,
        secs: u64,
    },

    #[error("another operation on '{0}' is already in progress")]
    Busy(String),

    #[error("'{0}' is not in the image catalog. Run 'wslhub catalog' to list available distributions.")]
    NotInCatalog(String),

    #[error("unexpected output from '{action}': {output}")]
    MalformedOutput { action: &'static str, output: String },

    #[error("operation on '{0}' was cancelled")]
    Cancelled(String),

    #[error("'{0}' is not a valid distribution name (letters, digits, '-', '_' and '.')")]
    InvalidName(String),

    #[error("invalid credentials: {0}")]
    InvalidCredentials(&'static str),
}

impl DistroError {
    /// Build a `Classified` error for an outcome other than `Unclassified`.
    #[must_use]
    pub fn classified(outcome: Outcome, output: impl Into<String>) -> Self {
        DistroError::Classified {
            outcome,
            output: output.into(),
        }
    }

    /// The classified outcome, when this error carries one.
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            DistroError::Classified { outcome, .. } => Some(*outcome),
            _ => None,
        }
    }

    /// Stable machine-readable code for `--json` error objects.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            DistroError::ProcessSpawn { .. } => "process_spawn",
            DistroError::ProcessExecution { .. } => "process_execution",
            DistroError::ProcessTimeout { .. } | DistroError::Timeout { .. } => "timeout",
            DistroError::Classified { .. } => "classified_state",
            DistroError::Network(_) => "network",
            DistroError::Integrity { .. } => "integrity",
            DistroError::RegistryLookup(_) | DistroError::NotRegistered(_) => "registry_lookup",
            DistroError::Filesystem { .. } => "filesystem",
            DistroError::UnregisteredAction(_) => "unregistered_action",
            DistroError::Busy(_) => "busy",
            DistroError::NotInCatalog(_) => "not_in_catalog",
            DistroError::MalformedOutput { .. } => "malformed_output",
            DistroError::Cancelled(_) => "cancelled",
            DistroError::InvalidName(_) => "invalid_name",
            DistroError::InvalidCredentials(_) => "invalid_credentials",
        }
    }
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration key/value validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown setting: {key}\n\nValid settings: {valid}")]
    UnknownKey { key: String, valid: String },

    #[error("Invalid value for {key}: {value}\n\n{expected}")]
    InvalidValue {
        key: String,
        value: String,
        expected: String,
    },
}
