//! `wslhub info <name>`: where a distribution lives on disk.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::{registry, status};
use crate::output::json;

/// Arguments for the info command.
#[derive(Args)]
pub struct InfoArgs {
    /// Registered distribution name
    pub name: String,

    /// Print only the install directory
    #[arg(long)]
    pub path: bool,
}

/// Run `wslhub info`.
///
/// # Errors
///
/// Returns an error if the distribution is not in the registry.
pub fn run(app: &AppContext, args: &InfoArgs) -> Result<ExitCode> {
    if args.path {
        let location = status::install_location(&app.registry, &args.name)?;
        println!("{}", location.display());
        return Ok(ExitCode::SUCCESS);
    }

    let record = registry::lookup(&app.registry, &args.name)?;
    if app.is_json() {
        json::print(&serde_json::json!({
            "name": args.name,
            "basePath": record.base_path,
            "vhdFileName": record.vhd_file_name,
            "runOobe": record.run_oobe,
        }))?;
        return Ok(ExitCode::SUCCESS);
    }
    app.output.header(&args.name);
    app.output.kv("location  ", &record.base_path.display().to_string());
    app.output.kv("disk      ", &record.backing_file().display().to_string());
    app.output.kv("first run ", if record.run_oobe { "pending" } else { "done" });
    Ok(ExitCode::SUCCESS)
}
