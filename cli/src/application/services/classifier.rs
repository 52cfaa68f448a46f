//! Application service: output classification.
//!
//! Wraps the pure rule matcher and resolves the "target is listed" rule with
//! a follow-up `/etc/wsl.conf` query inside the distribution.

use crate::application::ports::ActionRunner;
use crate::domain::{DistroError, Outcome, RuleMatch, WslAction, match_rules, resolve_listed};

/// Classify sanitized `text` produced by an action targeting `distro`.
pub async fn classify(runner: &impl ActionRunner, text: &str, distro: &str) -> Outcome {
    match match_rules(text, distro) {
        RuleMatch::Outcome(outcome) => outcome,
        RuleMatch::DistroListed => {
            let conf = runner
                .run_action(WslAction::QueryDefaultUserConfig { distro })
                .await;
            resolve_listed(&conf.text())
        }
    }
}

/// Classify `text` and turn any classified outcome into an error.
///
/// # Errors
///
/// `Classified` for every outcome except `Unclassified`.
pub async fn reject_classified(
    runner: &impl ActionRunner,
    text: &str,
    distro: &str,
) -> Result<(), DistroError> {
    let outcome = classify(runner, text, distro).await;
    if outcome.is_classified() {
        tracing::debug!(distro, ?outcome, "tool output classified");
        return Err(DistroError::classified(outcome, text));
    }
    Ok(())
}
