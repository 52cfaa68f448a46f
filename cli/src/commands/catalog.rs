//! `wslhub catalog`: distributions available for install.

use std::process::ExitCode;

use anyhow::Result;
use owo_colors::OwoColorize as _;
use wslhub_common::CatalogListing;

use crate::app::AppContext;
use crate::output::json;

/// Run `wslhub catalog`.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn run(app: &AppContext) -> Result<ExitCode> {
    let listings: Vec<CatalogListing> = app
        .catalog
        .iter()
        .map(|entry| CatalogListing {
            name: entry.name.clone(),
            url: entry.url.clone(),
            sha256: entry.sha256.clone(),
        })
        .collect();

    if app.is_json() {
        json::print(&listings)?;
        return Ok(ExitCode::SUCCESS);
    }
    if app.output.quiet {
        return Ok(ExitCode::SUCCESS);
    }
    let width = listings.iter().map(|l| l.name.len()).max().unwrap_or(0);
    app.output.header("Available distributions");
    for listing in &listings {
        println!(
            "  {:<width$}  {}",
            listing.name,
            listing.url.style(app.output.styles.dim)
        );
    }
    Ok(ExitCode::SUCCESS)
}
