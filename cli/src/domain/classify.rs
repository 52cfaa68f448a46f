//! Classification of sanitized `wsl.exe` output into typed outcomes.
//!
//! Pure functions only. The one rule that needs a second tool invocation
//! (the target distribution is listed) is returned as
//! [`RuleMatch::DistroListed`] and resolved by the application layer.

use std::fmt;

use serde::Serialize;

/// Closed set of outcomes a tool response can be classified as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    ElevationRequired,
    AlreadyInstalledWithDefaultUser,
    AlreadyInstalledNoDefaultUser,
    InvalidUsername,
    PasswordTooShort,
    PasswordRejectedByPolicy,
    Unclassified,
}

impl Outcome {
    /// `true` for every outcome except `Unclassified`.
    #[must_use]
    pub fn is_classified(self) -> bool {
        self != Outcome::Unclassified
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Outcome::ElevationRequired => "administrator privileges are required",
            Outcome::AlreadyInstalledWithDefaultUser => {
                "distribution already exists with a default user"
            }
            Outcome::AlreadyInstalledNoDefaultUser => {
                "distribution already exists but has no default user"
            }
            Outcome::InvalidUsername => "user name is not valid",
            Outcome::PasswordTooShort => "password is too short",
            Outcome::PasswordRejectedByPolicy => "password was rejected by the dictionary check",
            Outcome::Unclassified => "unclassified tool output",
        };
        f.write_str(text)
    }
}

/// Result of the first-match rule scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleMatch {
    /// A rule that maps directly to an outcome.
    Outcome(Outcome),
    /// The target distribution name appears in the text; which
    /// "already installed" outcome applies depends on its `/etc/wsl.conf`.
    DistroListed,
}

enum Marker {
    Literal(&'static str),
    TargetName,
}

/// Ordered rule list; the first matching marker wins.
const RULES: &[(Marker, Option<Outcome>)] = &[
    (Marker::Literal("requireselevation"), Some(Outcome::ElevationRequired)),
    (Marker::TargetName, None),
    (Marker::Literal("invalid"), Some(Outcome::InvalidUsername)),
    (Marker::Literal("short"), Some(Outcome::PasswordTooShort)),
    (Marker::Literal("dictionary"), Some(Outcome::PasswordRejectedByPolicy)),
];

/// Scan `text` (already sanitized) against the ordered rule list.
#[must_use]
pub fn match_rules(text: &str, distro: &str) -> RuleMatch {
    let haystack = text.to_ascii_lowercase();
    let target = distro.to_ascii_lowercase();
    for (marker, outcome) in RULES {
        let hit = match marker {
            Marker::Literal(needle) => haystack.contains(needle),
            Marker::TargetName => !target.is_empty() && haystack.contains(&target),
        };
        if hit {
            return outcome.map_or(RuleMatch::DistroListed, RuleMatch::Outcome);
        }
    }
    RuleMatch::Outcome(Outcome::Unclassified)
}

/// Decide between the two "already installed" outcomes from the output of
/// the default-user configuration query.
#[must_use]
pub fn resolve_listed(wsl_conf: &str) -> Outcome {
    if wsl_conf.to_ascii_lowercase().contains("default") {
        Outcome::AlreadyInstalledWithDefaultUser
    } else {
        Outcome::AlreadyInstalledNoDefaultUser
    }
}
