//! `wslhub metrics <name>`: CPU, memory and disk usage of a distribution.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::status::get_metrics;
use crate::output::{json, progress};

/// Arguments for the metrics command.
#[derive(Args)]
pub struct MetricsArgs {
    /// Registered distribution name
    pub name: String,
}

/// Run `wslhub metrics`.
///
/// # Errors
///
/// Returns an error if sampling fails or the distribution is not registered.
pub async fn run(app: &AppContext, args: &MetricsArgs) -> Result<ExitCode> {
    let spinner = progress::spinner_for(&app.output, &format!("sampling {}...", args.name));
    let result = get_metrics(
        app.wsl.as_ref(),
        &app.registry,
        &app.disk,
        &args.name,
        app.config.memory.limit_gb,
        &app.config.timings,
    )
    .await;
    if let Some(pb) = &spinner {
        pb.finish_and_clear();
    }
    let snapshot = result?;

    if app.is_json() {
        json::print(&snapshot)?;
        return Ok(ExitCode::SUCCESS);
    }
    app.output.header(&args.name);
    app.output.kv("cpu   ", &format!("{:.1}%", snapshot.cpu_percent));
    app.output.kv(
        "memory",
        &format!("{:.2} / {:.0} GB", snapshot.mem_used_gb, snapshot.mem_total_gb),
    );
    app.output.kv(
        "disk  ",
        &format!(
            "{} / {}",
            format_bytes(snapshot.disk_used_bytes),
            format_bytes(snapshot.disk_total_bytes)
        ),
    );
    Ok(ExitCode::SUCCESS)
}

#[allow(clippy::cast_precision_loss)]
fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}
