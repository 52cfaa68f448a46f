//! `wslhub uninstall <name>`: unregister a distribution and its disk.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::uninstall::uninstall;

/// Arguments for the uninstall command.
#[derive(Args)]
pub struct UninstallArgs {
    /// Registered distribution name
    pub name: String,
}

/// Run `wslhub uninstall`.
///
/// # Errors
///
/// Returns an error if the prompt fails or the distribution cannot be
/// stopped or unregistered.
pub async fn run(app: &AppContext, args: &UninstallArgs) -> Result<ExitCode> {
    let name = args.name.as_str();
    if !app.is_json() && !app.output.quiet {
        println!();
        println!("This will unregister {name} and delete its virtual disk.");
        println!("Everything stored inside the distribution is lost.");
        println!();
    }
    if !app.confirm("Continue?", false)? {
        app.output.info("Cancelled.");
        return Ok(ExitCode::SUCCESS);
    }

    let reporter = app.reporter();
    let result = uninstall(
        app.wsl.as_ref(),
        &reporter,
        &app.locks,
        &app.config.timings,
        name,
    )
    .await;
    reporter.finish();
    result?;

    app.output.success(&format!("{name} uninstalled"));
    Ok(ExitCode::SUCCESS)
}
