//! Parsers for `/proc/stat` and `/proc/meminfo` samples.

use crate::domain::action::ActionKind;
use crate::domain::error::DistroError;

/// Aggregate CPU jiffies from the first line of `/proc/stat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuCounters {
    pub total: u64,
    pub idle: u64,
}

impl CpuCounters {
    /// Parse `cpu  user nice system idle ...`.
    ///
    /// # Errors
    ///
    /// `MalformedOutput` unless the line starts with `cpu` and carries at
    /// least four numeric fields.
    pub fn parse(text: &str) -> Result<Self, DistroError> {
        let malformed = || DistroError::MalformedOutput {
            action: ActionKind::CpuSample.name(),
            output: text.trim().to_string(),
        };
        let line = text
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .ok_or_else(malformed)?;
        let mut tokens = line.split_whitespace();
        if !tokens.next().is_some_and(|t| t.starts_with("cpu")) {
            return Err(malformed());
        }
        let fields = tokens
            .map(str::parse::<u64>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| malformed())?;
        if fields.len() < 4 {
            return Err(malformed());
        }
        Ok(Self {
            total: fields.iter().fold(0u64, |acc, v| acc.saturating_add(*v)),
            idle: fields[3],
        })
    }
}

/// Busy share between two snapshots, in percent. Zero when no time elapsed.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn cpu_usage(before: CpuCounters, after: CpuCounters) -> f64 {
    let total = after.total.saturating_sub(before.total);
    let idle = after.idle.saturating_sub(before.idle).min(total);
    if total == 0 {
        return 0.0;
    }
    (total - idle) as f64 / total as f64 * 100.0
}

/// `MemTotal` and `MemAvailable` in kB.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemInfo {
    pub total_kb: u64,
    pub available_kb: u64,
}

impl MemInfo {
    /// Parse `grep`-filtered `/proc/meminfo` lines by key.
    ///
    /// # Errors
    ///
    /// `MalformedOutput` when either key is missing or not numeric.
    pub fn parse(text: &str) -> Result<Self, DistroError> {
        let mut total = None;
        let mut available = None;
        for line in text.lines() {
            let Some((key, rest)) = line.split_once(':') else {
                continue;
            };
            let value = rest
                .split_whitespace()
                .next()
                .and_then(|v| v.parse::<u64>().ok());
            match key.trim() {
                "MemTotal" => total = value,
                "MemAvailable" => available = value,
                _ => {}
            }
        }
        match (total, available) {
            (Some(total_kb), Some(available_kb)) => Ok(Self {
                total_kb,
                available_kb,
            }),
            _ => Err(DistroError::MalformedOutput {
                action: ActionKind::MemSample.name(),
                output: text.trim().to_string(),
            }),
        }
    }

    /// `(total − available) / 1024²`, in GB.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn used_gb(&self) -> f64 {
        self.total_kb.saturating_sub(self.available_kb) as f64 / (1024.0 * 1024.0)
    }
}
