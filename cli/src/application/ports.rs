//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` and the shared types crate,
//! never from `crate::infra`, `crate::commands`, or `crate::output`.
//!
//! Ports used by the migration task return `Send` futures so the task can be
//! handed to `tokio::spawn`.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Duration;

use anyhow::Result;
use wslhub_common::Event;

use crate::domain::{ActionKind, DistroError, ImageCatalogEntry, WslAction, WslHubConfig, sanitize};

// ── Process ports ─────────────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
pub trait CommandRunner: Send + Sync {
    /// Run `program` to completion, optionally feeding `stdin`, and capture
    /// its output.
    ///
    /// # Errors
    ///
    /// Spawn and wait failures are returned as-is. Exceeding the runner's
    /// timeout kills the child and yields `ErrorKind::TimedOut`. A non-zero
    /// exit is *not* an error; inspect `Output::status`.
    fn run(
        &self,
        program: &str,
        args: &[String],
        stdin: Option<&[u8]>,
    ) -> impl Future<Output = std::io::Result<Output>> + Send;

    /// Bound applied to each run.
    fn timeout(&self) -> Duration;
}

/// Result of one `wsl.exe` action: the merged output bytes plus the process
/// error, if any. Textual failures are left for the classifier.
#[derive(Debug)]
pub struct ActionOutput {
    pub kind: ActionKind,
    pub raw: Vec<u8>,
    pub error: Option<DistroError>,
}

impl ActionOutput {
    #[must_use]
    pub fn ok(kind: ActionKind, raw: impl Into<Vec<u8>>) -> Self {
        Self {
            kind,
            raw: raw.into(),
            error: None,
        }
    }

    /// Sanitized text of the merged output.
    #[must_use]
    pub fn text(&self) -> String {
        sanitize(&self.raw)
    }

    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }

    /// Sanitized text on success, the process error otherwise.
    ///
    /// # Errors
    ///
    /// Returns the spawn, exit or timeout error recorded by the runner.
    pub fn into_result(self) -> Result<String, DistroError> {
        match self.error {
            None => Ok(sanitize(&self.raw)),
            Some(err) => Err(err),
        }
    }
}

/// Executes one action from the closed `wsl.exe` vocabulary.
pub trait ActionRunner: Send + Sync {
    fn run_action(&self, action: WslAction<'_>) -> impl Future<Output = ActionOutput> + Send;
}

// ── Event port ────────────────────────────────────────────────────────────────

/// One-way progress sink consumed by the presentation layer.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: Event);
}

// ── Download port ─────────────────────────────────────────────────────────────

/// Fetches a catalog image to disk with integrity verification.
#[allow(async_fn_in_trait)]
pub trait ImageDownloader {
    /// Download `entry` to `dest`, calling `on_progress` with whole percentages.
    ///
    /// On any failure the partial or mismatching file at `dest` is removed.
    async fn download(
        &self,
        entry: &ImageCatalogEntry,
        dest: &Path,
        on_progress: &mut (dyn FnMut(u8) + Send),
    ) -> Result<(), DistroError>;
}

// ── Platform probes ───────────────────────────────────────────────────────────

/// Read-only access to the per-user WSL registry hive.
pub trait RegistryReader {
    /// Names of the per-distribution subkeys.
    ///
    /// # Errors
    ///
    /// `RegistryLookup` when the hive cannot be opened or enumerated.
    fn distro_keys(&self) -> Result<Vec<String>, DistroError>;

    /// A string value of `subkey`, `None` when absent.
    ///
    /// # Errors
    ///
    /// `RegistryLookup` when the subkey cannot be opened.
    fn read_string(&self, subkey: &str, value: &str) -> Result<Option<String>, DistroError>;

    /// A DWORD value of `subkey`, `None` when absent.
    ///
    /// # Errors
    ///
    /// `RegistryLookup` when the subkey cannot be opened.
    fn read_u32(&self, subkey: &str, value: &str) -> Result<Option<u32>, DistroError>;
}

/// File sizes and volume capacity on the host.
pub trait DiskProbe {
    /// Size of `path` in bytes.
    ///
    /// # Errors
    ///
    /// `Filesystem` when the file cannot be stat'ed.
    fn file_size(&self, path: &Path) -> Result<u64, DistroError>;

    /// Total capacity of the volume containing `path`, if it can be found.
    fn volume_total(&self, path: &Path) -> Option<u64>;
}

/// Raw filesystem operations on pipeline artifacts.
pub trait LocalFs: Send + Sync {
    /// # Errors
    ///
    /// `Filesystem` when the directory cannot be created.
    fn create_dir_all(&self, path: &Path) -> Result<(), DistroError>;

    /// # Errors
    ///
    /// `Filesystem` when the file exists but cannot be removed.
    fn remove_file(&self, path: &Path) -> Result<(), DistroError>;

    fn exists(&self, path: &Path) -> bool;
}

// ── Config port ───────────────────────────────────────────────────────────────

/// Abstracts configuration persistence.
pub trait ConfigStore {
    /// Load the configuration, falling back to defaults when no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    fn load(&self) -> Result<WslHubConfig>;

    /// Persist `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    fn save(&self, config: &WslHubConfig) -> Result<()>;

    /// Location of the configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    fn path(&self) -> Result<PathBuf>;
}
