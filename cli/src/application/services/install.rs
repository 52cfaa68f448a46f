//! Application service: distribution install use-case.
//!
//! `Checking → {AlreadyExists | NeedsUserConfig | Downloading} → Importing →
//! ConfiguringUser → Done`. Each stage reports on `distribution-output`; the
//! terminal failure also goes out on `distribution-error`.

use std::fmt;

use wslhub_common::Event;

use crate::application::ports::{ActionRunner, EventSink, ImageDownloader};
use crate::application::services::classifier::classify;
use crate::application::services::locks::DistroLocks;
use crate::application::services::user_setup::configure_user;
use crate::domain::{
    ArtifactKind, Catalog, DistroError, OperationRequest, Outcome, RuleMatch, Timings, WslAction,
    match_rules, validate_distro_name,
};

/// Pipeline stage, used for progress text and failure tagging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallStage {
    Checking,
    Downloading,
    Importing,
    ConfiguringUser,
    Done,
}

impl fmt::Display for InstallStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InstallStage::Checking => "checking",
            InstallStage::Downloading => "downloading",
            InstallStage::Importing => "importing",
            InstallStage::ConfiguringUser => "configuring user",
            InstallStage::Done => "done",
        })
    }
}

/// How an install that returned `Ok` got there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    /// Downloaded, imported and (if credentials were given) provisioned.
    Installed { user_configured: bool },
    /// Already registered without a default user; only the user was set up.
    UserConfigured,
}

/// Collaborators of one install run.
pub struct InstallDeps<'a, R, D, E> {
    pub runner: &'a R,
    pub downloader: &'a D,
    pub events: &'a E,
    pub catalog: &'a Catalog,
    pub locks: &'a DistroLocks,
    pub timings: &'a Timings,
}

/// Install `request.name` from the catalog into `request.install_dir`.
///
/// # Errors
///
/// `Busy` if another operation holds the name, `NotInCatalog` before any
/// download, `Classified` for elevation/already-installed/user problems, and
/// download, import or process errors otherwise. Nothing is retried.
pub async fn install<R, D, E>(
    deps: &InstallDeps<'_, R, D, E>,
    request: &OperationRequest,
) -> Result<InstallOutcome, DistroError>
where
    R: ActionRunner,
    D: ImageDownloader,
    E: EventSink,
{
    let result = run(deps, request).await;
    match &result {
        Ok(_) => deps.events.emit(Event::DistributionOutput("success".to_string())),
        Err(err) => {
            tracing::error!(distro = %request.name, error = %err, "install failed");
            deps.events.emit(Event::DistributionError(err.to_string()));
        }
    }
    result
}

async fn run<R, D, E>(
    deps: &InstallDeps<'_, R, D, E>,
    request: &OperationRequest,
) -> Result<InstallOutcome, DistroError>
where
    R: ActionRunner,
    D: ImageDownloader,
    E: EventSink,
{
    let name = request.name.as_str();
    validate_distro_name(name)?;
    let _guard = deps.locks.try_acquire(name)?;
    let stage = |s: InstallStage| {
        tracing::info!(distro = name, stage = %s, "install");
        deps.events
            .emit(Event::DistributionOutput(format!("{s} {name}")));
    };

    stage(InstallStage::Checking);
    let listing = deps
        .runner
        .run_action(WslAction::List { verbose: false })
        .await;
    let text = listing.text();
    // `wsl -l -q` exits non-zero when nothing is installed, so only a tool
    // that never ran stops the install here.
    if let Some(err @ (DistroError::ProcessSpawn { .. } | DistroError::ProcessTimeout { .. })) =
        listing.error
    {
        return Err(err);
    }
    match classify(deps.runner, &text, name).await {
        Outcome::AlreadyInstalledNoDefaultUser => {
            let Some(creds) = &request.credentials else {
                return Err(DistroError::classified(
                    Outcome::AlreadyInstalledNoDefaultUser,
                    text,
                ));
            };
            deps.events.emit(Event::DistributionOutput(format!(
                "{name} is already installed, configuring user"
            )));
            stage(InstallStage::ConfiguringUser);
            configure_user(
                deps.runner,
                deps.events,
                Event::DistributionOutput,
                name,
                creds,
                deps.timings,
            )
            .await?;
            stage(InstallStage::Done);
            return Ok(InstallOutcome::UserConfigured);
        }
        Outcome::Unclassified => {}
        outcome => return Err(DistroError::classified(outcome, text)),
    }

    let entry = deps.catalog.require(name)?;
    let image = request.artifact(ArtifactKind::Image);

    stage(InstallStage::Downloading);
    let mut last = None;
    let mut on_progress = |pct: u8| {
        if last != Some(pct) {
            last = Some(pct);
            deps.events
                .emit(Event::DistributionOutput(format!("downloading {name}: {pct}%")));
        }
    };
    deps.downloader
        .download(entry, &image, &mut on_progress)
        .await?;
    tokio::time::sleep(deps.timings.settle()).await;

    stage(InstallStage::Importing);
    let import = deps
        .runner
        .run_action(WslAction::Import {
            distro: name,
            install_dir: &request.install_dir,
            artifact: &image,
        })
        .await;
    let import_text = import.text();
    if let Some(err) = import.error {
        // Not registered yet: the name in this text is only the import path.
        let outcome = match match_rules(&import_text, name) {
            RuleMatch::Outcome(outcome) => outcome,
            RuleMatch::DistroListed => Outcome::Unclassified,
        };
        return Err(if outcome.is_classified() {
            DistroError::classified(outcome, import_text)
        } else {
            err
        });
    }

    let user_configured = match &request.credentials {
        Some(creds) => {
            stage(InstallStage::ConfiguringUser);
            configure_user(
                deps.runner,
                deps.events,
                Event::DistributionOutput,
                name,
                creds,
                deps.timings,
            )
            .await?;
            true
        }
        None => false,
    };

    stage(InstallStage::Done);
    Ok(InstallOutcome::Installed { user_configured })
}
