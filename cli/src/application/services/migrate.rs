//! Application service: relocate an installed distribution to a new path.
//!
//! Runs as a spawned task. The caller gets a [`MigrationHandle`] to cancel or
//! await it. Progress goes out on `migration-progress` and a single
//! `migration-done` closes every run.
//!
//! Cancellation is honoured up to and including the export. Once the source
//! has been unregistered the task ignores it and runs to completion.

use std::fmt;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use wslhub_common::{Completion, Event};

use crate::application::ports::{ActionRunner, EventSink, LocalFs};
use crate::application::services::locks::{DistroGuard, DistroLocks};
use crate::application::services::status::wait_until_stopped;
use crate::application::services::user_setup::{
    configure_user, current_default_user, restore_default_user,
};
use crate::domain::{
    ArtifactKind, DistroError, OperationRequest, Timings, WslAction, validate_distro_name,
};

/// Migration steps, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MigrationStep {
    Terminate,
    WaitStopped,
    Export,
    Unregister,
    Import,
    Start,
    ConfigureUser,
}

impl MigrationStep {
    /// From this step on a failure leaves an archive to clean up.
    fn owns_archive(self) -> bool {
        self >= MigrationStep::Export
    }

    fn cancellable(self) -> bool {
        self <= MigrationStep::Export
    }
}

impl fmt::Display for MigrationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MigrationStep::Terminate => "terminate",
            MigrationStep::WaitStopped => "wait-stopped",
            MigrationStep::Export => "export",
            MigrationStep::Unregister => "unregister",
            MigrationStep::Import => "import",
            MigrationStep::Start => "start",
            MigrationStep::ConfigureUser => "configure-user",
        })
    }
}

/// Collaborators moved into the migration task.
pub struct MigrationDeps<R, E, F> {
    pub runner: Arc<R>,
    pub events: Arc<E>,
    pub fs: Arc<F>,
    pub locks: DistroLocks,
    pub timings: Timings,
}

/// Handle to a running migration.
#[derive(Debug)]
pub struct MigrationHandle {
    name: String,
    cancel: CancellationToken,
    join: JoinHandle<Result<(), DistroError>>,
}

impl MigrationHandle {
    /// Request cancellation. No effect once the source has been unregistered.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Wait for the task and return its result.
    ///
    /// # Errors
    ///
    /// The error of the failing step, or `Cancelled`.
    pub async fn wait(self) -> Result<(), DistroError> {
        match self.join.await {
            Ok(result) => result,
            Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
            Err(_) => Err(DistroError::Cancelled(self.name)),
        }
    }
}

/// Take the name lock and start the migration task.
///
/// `request.install_dir` is the destination. The archive is written to
/// `<install_dir>/<name>.tar`.
///
/// # Errors
///
/// `InvalidName` or `Busy`; both are reported before anything runs.
pub fn spawn_migration<R, E, F>(
    deps: MigrationDeps<R, E, F>,
    request: OperationRequest,
) -> Result<MigrationHandle, DistroError>
where
    R: ActionRunner + 'static,
    E: EventSink + 'static,
    F: LocalFs + 'static,
{
    validate_distro_name(&request.name)?;
    let guard = deps.locks.try_acquire(&request.name)?;
    let cancel = CancellationToken::new();
    let name = request.name.clone();
    let task_cancel = cancel.clone();
    let join = tokio::spawn(async move { run(deps, request, task_cancel, guard).await });
    Ok(MigrationHandle { name, cancel, join })
}

async fn run<R, E, F>(
    deps: MigrationDeps<R, E, F>,
    request: OperationRequest,
    cancel: CancellationToken,
    _guard: DistroGuard,
) -> Result<(), DistroError>
where
    R: ActionRunner,
    E: EventSink,
    F: LocalFs,
{
    let archive = request.artifact(ArtifactKind::Archive);
    let mut reached = MigrationStep::Terminate;
    let result = steps(&deps, &request, &cancel, &mut reached).await;

    if reached.owns_archive() && deps.fs.exists(&archive) {
        if let Err(err) = deps.fs.remove_file(&archive) {
            tracing::warn!(archive = %archive.display(), error = %err, "archive cleanup failed");
        }
    }

    let done = match &result {
        Ok(()) => {
            tracing::info!(distro = %request.name, "migration complete");
            Completion::success()
        }
        Err(err) => {
            tracing::error!(distro = %request.name, step = %reached, error = %err, "migration failed");
            Completion::failed(format!("{reached}: {err}"))
        }
    };
    deps.events.emit(Event::MigrationDone(done));
    result
}

async fn steps<R, E, F>(
    deps: &MigrationDeps<R, E, F>,
    request: &OperationRequest,
    cancel: &CancellationToken,
    reached: &mut MigrationStep,
) -> Result<(), DistroError>
where
    R: ActionRunner,
    E: EventSink,
    F: LocalFs,
{
    let runner = deps.runner.as_ref();
    let events = deps.events.as_ref();
    let distro = request.name.as_str();
    let new_dir = request.install_dir.as_path();
    let archive = request.artifact(ArtifactKind::Archive);

    let previous_user = if request.credentials.is_none() {
        current_default_user(runner, distro).await
    } else {
        None
    };

    let mut enter = |step: MigrationStep, message: String| -> Result<(), DistroError> {
        *reached = step;
        if step.cancellable() && cancel.is_cancelled() {
            return Err(DistroError::Cancelled(distro.to_string()));
        }
        tracing::info!(distro, %step, "migration");
        events.emit(Event::MigrationProgress(message));
        Ok(())
    };

    enter(MigrationStep::Terminate, format!("stopping {distro}"))?;
    runner
        .run_action(WslAction::Terminate { distro })
        .await
        .into_result()?;

    enter(MigrationStep::WaitStopped, format!("waiting for {distro} to stop"))?;
    tokio::select! {
        res = wait_until_stopped(runner, distro, &deps.timings) => res?,
        () = cancel.cancelled() => return Err(DistroError::Cancelled(distro.to_string())),
    }

    enter(MigrationStep::Export, format!("exporting {distro}"))?;
    deps.fs.create_dir_all(new_dir)?;
    tokio::select! {
        out = runner.run_action(WslAction::Export { distro, archive: &archive }) => {
            out.into_result()?;
        }
        () = cancel.cancelled() => return Err(DistroError::Cancelled(distro.to_string())),
    }

    enter(MigrationStep::Unregister, format!("unregistering {distro}"))?;
    runner
        .run_action(WslAction::Unregister { distro })
        .await
        .into_result()?;

    enter(
        MigrationStep::Import,
        format!("importing {distro} into {}", new_dir.display()),
    )?;
    runner
        .run_action(WslAction::Import {
            distro,
            install_dir: new_dir,
            artifact: &archive,
        })
        .await
        .into_result()?;

    enter(MigrationStep::Start, format!("starting {distro}"))?;
    runner
        .run_action(WslAction::Start { distro })
        .await
        .into_result()?;
    tokio::time::sleep(deps.timings.restart_settle()).await;

    enter(MigrationStep::ConfigureUser, "restoring user configuration".to_string())?;
    match (&request.credentials, previous_user) {
        (Some(creds), _) => {
            configure_user(
                runner,
                events,
                Event::MigrationProgress,
                distro,
                creds,
                &deps.timings,
            )
            .await?;
        }
        (None, Some(user)) => {
            restore_default_user(
                runner,
                events,
                Event::MigrationProgress,
                distro,
                &user,
                &deps.timings,
            )
            .await?;
        }
        (None, None) => {
            events.emit(Event::MigrationProgress(
                "no default user to restore".to_string(),
            ));
        }
    }
    Ok(())
}
