//! `wslhub migrate <name> <destination>`: move a distribution's disk.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::migrate::{MigrationDeps, spawn_migration};
use crate::commands::UserArgs;
use crate::domain::OperationRequest;

/// Arguments for the migrate command.
#[derive(Args)]
pub struct MigrateArgs {
    /// Registered distribution name
    pub name: String,

    /// Directory that will hold the migrated virtual disk
    pub destination: PathBuf,

    #[command(flatten)]
    pub user: UserArgs,
}

/// Run `wslhub migrate`.
///
/// Ctrl-C cancels the migration while it can still be undone, i.e. up to and
/// including the export.
///
/// # Errors
///
/// Returns an error if the name is invalid or busy, or the prompt fails.
pub async fn run(app: &AppContext, args: MigrateArgs) -> Result<ExitCode> {
    let prompt = format!(
        "Move {} to {}? It will be stopped and re-registered",
        args.name,
        args.destination.display()
    );
    if !app.confirm(&prompt, true)? {
        app.output.info("Cancelled.");
        return Ok(ExitCode::SUCCESS);
    }
    let credentials = args.user.credentials(app)?;
    let request = OperationRequest {
        name: args.name,
        install_dir: args.destination,
        credentials,
        download_threads: None,
    };

    let events = Arc::new(app.reporter());
    let deps = MigrationDeps {
        runner: Arc::clone(&app.wsl),
        events: Arc::clone(&events),
        fs: Arc::clone(&app.fs),
        locks: app.locks.clone(),
        timings: app.config.timings.clone(),
    };
    let handle = spawn_migration(deps, request)?;

    let token = handle.cancellation_token();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, cancelling migration");
            token.cancel();
        }
    });
    let result = handle.wait().await;
    interrupt.abort();
    events.finish();

    // The outcome is already on the event stream as `migration-done`.
    Ok(if result.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
