//! `wslhub start <name>` and `wslhub shutdown`.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::status;
use crate::output::json;

/// Arguments for the start command.
#[derive(Args)]
pub struct StartArgs {
    /// Registered distribution name
    pub name: String,
}

/// Run `wslhub start`.
///
/// # Errors
///
/// Returns an error if `wsl.exe` cannot start the distribution.
pub async fn run(app: &AppContext, args: &StartArgs) -> Result<ExitCode> {
    status::start(app.wsl.as_ref(), &args.name).await?;
    if app.is_json() {
        json::print(&serde_json::json!({ "name": args.name, "started": true }))?;
    } else {
        app.output.success(&format!("{} started", args.name));
    }
    Ok(ExitCode::SUCCESS)
}

/// Run `wslhub shutdown`.
///
/// # Errors
///
/// Returns an error if the prompt fails or `wsl --shutdown` fails.
pub async fn shutdown(app: &AppContext) -> Result<ExitCode> {
    if !app.confirm("Stop every running distribution?", true)? {
        app.output.info("Cancelled.");
        return Ok(ExitCode::SUCCESS);
    }
    status::shutdown(app.wsl.as_ref()).await?;
    if app.is_json() {
        json::print(&serde_json::json!({ "shutdown": true }))?;
    } else {
        app.output.success("All distributions stopped");
    }
    Ok(ExitCode::SUCCESS)
}
