//! Distribution request/record types and parsers for `wsl.exe` text output.
//!
//! Pure functions only: no I/O, no async, no filesystem access.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use wslhub_common::{DistroStatusEntry, RunState};

use crate::domain::error::DistroError;

// ── Requests ─────────────────────────────────────────────────────────────────

/// Login to provision inside a distribution.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Check the account before it reaches `chpasswd`, which reads one
    /// `user:password` pair per line.
    ///
    /// # Errors
    ///
    /// `InvalidCredentials` for an empty user or password, a user name with
    /// `:` or whitespace, or a password containing a line break.
    pub fn validate(&self) -> Result<(), DistroError> {
        let reject = |why: &'static str| -> Result<(), DistroError> {
            Err(DistroError::InvalidCredentials(why))
        };
        if self.username.is_empty() {
            return reject("user name must not be empty");
        }
        if self
            .username
            .chars()
            .any(|c| c == ':' || c.is_whitespace() || c.is_control())
        {
            return reject("user name must not contain ':', whitespace or control characters");
        }
        if self.password.is_empty() {
            return reject("password must not be empty");
        }
        if self.password.contains(['\n', '\r', '\0']) {
            return reject("password must not contain line breaks or NUL");
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Parameters of one install or migration call.
#[derive(Debug, Clone)]
pub struct OperationRequest {
    pub name: String,
    /// Directory the distribution's virtual disk is imported into.
    pub install_dir: PathBuf,
    /// Account to provision. `None` leaves the distribution's own first-boot
    /// setup in place (install) or restores the previous default user
    /// (migration).
    pub credentials: Option<Credentials>,
    /// Advisory only; downloads use a single stream.
    pub download_threads: Option<u32>,
}

impl OperationRequest {
    /// Path of the artifact of `kind` for this request.
    #[must_use]
    pub fn artifact(&self, kind: ArtifactKind) -> PathBuf {
        artifact_path(&self.install_dir, &self.name, kind)
    }
}

// ── Artifacts ────────────────────────────────────────────────────────────────

/// Files produced and consumed by the pipelines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Freshly downloaded image.
    Image,
    /// `wsl --export` archive used for migration.
    Archive,
}

impl ArtifactKind {
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            ArtifactKind::Image => "wsl",
            ArtifactKind::Archive => "tar",
        }
    }
}

/// `<dir>/<name>.<ext>`.
#[must_use]
pub fn artifact_path(dir: &Path, name: &str, kind: ArtifactKind) -> PathBuf {
    dir.join(format!("{name}.{}", kind.extension()))
}

/// Reject names that are empty or could escape the install directory when
/// used as a file name.
pub fn validate_distro_name(name: &str) -> Result<(), DistroError> {
    let ok = !name.is_empty()
        && name.len() <= 64
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        && !name.starts_with('.');
    if ok {
        Ok(())
    } else {
        Err(DistroError::InvalidName(name.to_string()))
    }
}

// ── Registry record ──────────────────────────────────────────────────────────

/// Storage metadata for one registered distribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistroRecord {
    pub base_path: PathBuf,
    pub vhd_file_name: String,
    /// First-boot experience still pending.
    pub run_oobe: bool,
}

impl DistroRecord {
    /// Build a record, stripping the `\\?\` long-path prefix WSL stores.
    #[must_use]
    pub fn new(base_path: &str, vhd_file_name: &str, run_oobe: bool) -> Self {
        let base = base_path.strip_prefix(r"\\?\").unwrap_or(base_path);
        Self {
            base_path: PathBuf::from(base),
            vhd_file_name: vhd_file_name.to_string(),
            run_oobe,
        }
    }

    /// Full path of the backing virtual disk.
    #[must_use]
    pub fn backing_file(&self) -> PathBuf {
        self.base_path.join(&self.vhd_file_name)
    }
}

// ── Parsers ──────────────────────────────────────────────────────────────────

/// Parse sanitized `wsl --list --verbose` output.
///
/// The first line is a header. Each remaining line may start with the `*`
/// default marker and must have at least three columns; malformed lines are
/// skipped.
#[must_use]
pub fn parse_list_verbose(text: &str) -> Vec<DistroStatusEntry> {
    text.lines()
        .skip(1)
        .filter_map(|raw| {
            let line = raw.trim();
            let (is_default, line) = match line.strip_prefix('*') {
                Some(rest) => (true, rest.trim_start()),
                None => (false, line),
            };
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 3 {
                return None;
            }
            Some(DistroStatusEntry {
                name: fields[0].to_string(),
                status: RunState::from(fields[1].to_string()),
                version: fields[fields.len() - 1].to_string(),
                is_default,
            })
        })
        .collect()
}

/// `true` when `name` is listed and reports `Running`.
#[must_use]
pub fn is_running(entries: &[DistroStatusEntry], name: &str) -> bool {
    entries
        .iter()
        .find(|e| e.name.eq_ignore_ascii_case(name))
        .is_some_and(|e| e.status.is_running())
}

/// Extract `default=` from the `[user]` section of `/etc/wsl.conf`.
#[must_use]
pub fn parse_default_user(wsl_conf: &str) -> Option<String> {
    let mut in_user = false;
    for raw in wsl_conf.lines() {
        let line = raw.trim();
        if line.eq_ignore_ascii_case("[user]") {
            in_user = true;
            continue;
        }
        if !in_user {
            continue;
        }
        if line.starts_with('[') {
            break;
        }
        if let Some((key, value)) = line.split_once('=')
            && key.trim().eq_ignore_ascii_case("default")
        {
            let user = value.trim();
            if !user.is_empty() {
                return Some(user.to_string());
            }
        }
    }
    None
}

static VERSION_TOKEN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\b(\d+(?:\.\d+)+)\b").ok());

/// Extract the WSL package version from sanitized `wsl --version` output.
///
/// Takes the first dotted number on the first line mentioning `WSL` but not
/// `WSLg`.
#[must_use]
pub fn parse_wsl_version(text: &str) -> Option<String> {
    let re = VERSION_TOKEN.as_ref()?;
    text.lines()
        .find(|l| l.contains("WSL") && !l.contains("WSLg"))
        .and_then(|l| re.captures(l))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}
