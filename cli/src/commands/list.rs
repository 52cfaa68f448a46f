//! `wslhub list`: installed distributions and their state.

use std::process::ExitCode;

use anyhow::Result;
use owo_colors::OwoColorize as _;
use wslhub_common::DistroStatusEntry;

use crate::app::AppContext;
use crate::application::services::status::list_distros;
use crate::output::{Styles, json};

/// Run `wslhub list`.
///
/// # Errors
///
/// Returns an error if `wsl --list --verbose` fails.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    let entries = list_distros(app.wsl.as_ref()).await?;
    if app.is_json() {
        json::print(&entries)?;
        return Ok(ExitCode::SUCCESS);
    }
    if entries.is_empty() {
        app.output.info("No distributions installed. Run 'wslhub catalog' to pick one.");
        return Ok(ExitCode::SUCCESS);
    }
    if app.output.quiet {
        return Ok(ExitCode::SUCCESS);
    }
    let width = entries.iter().map(|e| e.name.len()).max().unwrap_or(0);
    app.output.header("Distributions");
    for entry in &entries {
        println!("{}", format_row(entry, width, &app.output.styles));
    }
    Ok(ExitCode::SUCCESS)
}

/// One table row: default marker, padded name, state, WSL version.
fn format_row(entry: &DistroStatusEntry, width: usize, styles: &Styles) -> String {
    let marker = if entry.is_default { "*" } else { " " };
    let state = format!("{:<8}", entry.status.to_string());
    let state = state.style(styles.state(&entry.status));
    format!(
        "  {marker} {:<width$}  {state}  WSL{}",
        entry.name, entry.version
    )
}
