//! One-way progress events consumed by a presentation layer.
//!
//! Topic names match the channels a GUI subscribes to; the payload is either
//! free text or a structured completion record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Final status carried by a completion event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionStatus {
    Success,
    Failed,
}

/// Structured `{status, error?}` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    pub status: CompletionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Completion {
    #[must_use]
    pub fn success() -> Self {
        Self {
            status: CompletionStatus::Success,
            error: None,
        }
    }

    #[must_use]
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            status: CompletionStatus::Failed,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "topic", content = "payload", rename_all = "kebab-case")]
pub enum Event {
    DistributionOutput(String),
    DistributionError(String),
    MigrationProgress(String),
    MigrationDone(Completion),
    UninstallProgress(String),
}

impl Event {
    /// Channel name this event is published on.
    #[must_use]
    pub fn topic(&self) -> &'static str {
        match self {
            Event::DistributionOutput(_) => "distribution-output",
            Event::DistributionError(_) => "distribution-error",
            Event::MigrationProgress(_) => "migration-progress",
            Event::MigrationDone(_) => "migration-done",
            Event::UninstallProgress(_) => "uninstall-progress",
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        match self {
            Event::DistributionError(_) => true,
            Event::MigrationDone(done) => done.status == CompletionStatus::Failed,
            _ => false,
        }
    }
}

/// Timestamped event, the unit written to a JSON-lines stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    pub at: DateTime<Utc>,
    #[serde(flatten)]
    pub event: Event,
}

impl EventRecord {
    #[must_use]
    pub fn now(event: Event) -> Self {
        Self {
            at: Utc::now(),
            event,
        }
    }
}
