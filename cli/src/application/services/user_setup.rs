//! Application service: default-user provisioning inside a distribution.
//!
//! Shared by install and migration. Progress text goes through the caller's
//! event constructor so each pipeline reports on its own topic.

use wslhub_common::Event;

use crate::application::ports::{ActionRunner, EventSink};
use crate::application::services::classifier::reject_classified;
use crate::domain::{Credentials, DistroError, Timings, WslAction, parse_default_user};

/// Create the account, set its password, grant sudo and make it the default
/// login, then stop the distribution so the new default applies.
///
/// # Errors
///
/// The first step whose output classifies to anything but `Unclassified`
/// aborts with that outcome. A process failure with unclassified output is
/// reported as a warning and the sequence continues.
pub async fn configure_user(
    runner: &impl ActionRunner,
    events: &impl EventSink,
    progress: fn(String) -> Event,
    distro: &str,
    creds: &Credentials,
    timings: &Timings,
) -> Result<(), DistroError> {
    creds.validate()?;
    let user = creds.username.as_str();
    let steps = [
        ("creating user", WslAction::CreateUser { distro, user }),
        (
            "setting password",
            WslAction::SetPassword {
                distro,
                user,
                password: &creds.password,
            },
        ),
        ("granting sudo", WslAction::GrantElevatedGroup { distro, user }),
        ("setting default user", WslAction::SetDefaultUser { distro, user }),
    ];

    for (label, action) in steps {
        events.emit(progress(format!("{label} '{user}'")));
        tracing::info!(distro, step = label, "user setup");
        let out = runner.run_action(action).await;
        let text = out.text();
        reject_classified(runner, &text, distro).await?;
        if let Some(err) = out.error {
            tracing::warn!(distro, step = label, error = %err, "user setup step failed");
            events.emit(progress(format!("warning: {label} failed: {err}")));
        }
    }

    stop_to_apply(runner, events, progress, distro, timings).await;
    Ok(())
}

/// Re-point the default login at an account that already exists.
///
/// # Errors
///
/// Fails if the write to `/etc/wsl.conf` fails.
pub async fn restore_default_user(
    runner: &impl ActionRunner,
    events: &impl EventSink,
    progress: fn(String) -> Event,
    distro: &str,
    user: &str,
    timings: &Timings,
) -> Result<(), DistroError> {
    events.emit(progress(format!("restoring default user '{user}'")));
    runner
        .run_action(WslAction::SetDefaultUser { distro, user })
        .await
        .into_result()?;
    stop_to_apply(runner, events, progress, distro, timings).await;
    Ok(())
}

/// Read the configured default login from the distribution's `/etc/wsl.conf`.
pub async fn current_default_user(runner: &impl ActionRunner, distro: &str) -> Option<String> {
    let out = runner
        .run_action(WslAction::QueryDefaultUserConfig { distro })
        .await;
    if out.error.is_some() {
        return None;
    }
    parse_default_user(&out.text())
}

async fn stop_to_apply(
    runner: &impl ActionRunner,
    events: &impl EventSink,
    progress: fn(String) -> Event,
    distro: &str,
    timings: &Timings,
) {
    if let Some(err) = runner.run_action(WslAction::Stop { distro }).await.error {
        tracing::warn!(distro, error = %err, "stop after user setup failed");
        events.emit(progress(format!("warning: could not stop '{distro}': {err}")));
    }
    tokio::time::sleep(timings.settle()).await;
}
