//! Application service: remove a distribution and its virtual disk.

use wslhub_common::Event;

use crate::application::ports::{ActionRunner, EventSink};
use crate::application::services::locks::DistroLocks;
use crate::application::services::status::wait_until_stopped;
use crate::domain::{DistroError, Timings, WslAction, validate_distro_name};

/// Terminate `distro`, wait for it to stop, then unregister it.
///
/// # Errors
///
/// `Busy`, `Timeout` while waiting, or the failing command's error carrying
/// its sanitized output.
pub async fn uninstall(
    runner: &impl ActionRunner,
    events: &impl EventSink,
    locks: &DistroLocks,
    timings: &Timings,
    distro: &str,
) -> Result<(), DistroError> {
    validate_distro_name(distro)?;
    let _guard = locks.try_acquire(distro)?;
    let progress = |msg: String| events.emit(Event::UninstallProgress(msg));

    progress(format!("stopping {distro}"));
    runner
        .run_action(WslAction::Terminate { distro })
        .await
        .into_result()?;

    progress(format!("waiting for {distro} to stop"));
    wait_until_stopped(runner, distro, timings).await?;

    progress(format!("unregistering {distro}"));
    runner
        .run_action(WslAction::Unregister { distro })
        .await
        .into_result()
        .inspect_err(|err| tracing::error!(distro, error = %err, "unregister failed"))?;

    progress(format!("{distro} removed"));
    tracing::info!(distro, "uninstalled");
    Ok(())
}
