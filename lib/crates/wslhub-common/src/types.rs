use serde::{Deserialize, Serialize};

/// Run state reported by `wsl --list --verbose`.
///
/// States other than `Running`/`Stopped` (e.g. `Installing`, `Converting`)
/// are kept verbatim so a front-end can still show them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RunState {
    Running,
    Stopped,
    Other(String),
}

impl RunState {
    #[must_use]
    pub fn is_running(&self) -> bool {
        matches!(self, RunState::Running)
    }
}

impl From<String> for RunState {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Running" => RunState::Running,
            "Stopped" => RunState::Stopped,
            _ => RunState::Other(value),
        }
    }
}

impl From<RunState> for String {
    fn from(value: RunState) -> Self {
        match value {
            RunState::Running => "Running".to_string(),
            RunState::Stopped => "Stopped".to_string(),
            RunState::Other(s) => s,
        }
    }
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunState::Running => f.write_str("Running"),
            RunState::Stopped => f.write_str("Stopped"),
            RunState::Other(s) => f.write_str(s),
        }
    }
}

/// One row of the installed-distribution list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistroStatusEntry {
    pub name: String,
    pub status: RunState,
    pub version: String,
    /// Marked with `*` in the list output.
    #[serde(default)]
    pub is_default: bool,
}

/// Live resource usage of a single distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub cpu_percent: f64,
    pub mem_used_gb: f64,
    /// Configured memory limit, not the sampled kernel total.
    pub mem_total_gb: f64,
    pub disk_used_bytes: u64,
    /// Capacity of the volume holding the backing file.
    pub disk_total_bytes: u64,
}

/// Catalog row as exposed to front-ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogListing {
    pub name: String,
    pub url: String,
    pub sha256: String,
}
