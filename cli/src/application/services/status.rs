//! Application service: distribution status, metrics and simple lifecycle
//! actions (start, global shutdown, version).
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::path::PathBuf;
use std::time::Instant;

use wslhub_common::{DistroStatusEntry, MetricsSnapshot};

use crate::application::ports::{ActionRunner, DiskProbe, RegistryReader};
use crate::application::services::registry;
use crate::domain::config::Timings;
use crate::domain::distro::is_running;
use crate::domain::metrics::{CpuCounters, MemInfo, cpu_usage};
use crate::domain::{DistroError, WslAction, parse_list_verbose, parse_wsl_version};

/// Reported when `wsl --version` has no recognisable version line.
pub const UNKNOWN_VERSION: &str = "Unknown";

/// Installed distributions with their run state.
///
/// # Errors
///
/// Fails if `wsl --list --verbose` cannot be run.
pub async fn list_distros(
    runner: &impl ActionRunner,
) -> Result<Vec<DistroStatusEntry>, DistroError> {
    let text = runner
        .run_action(WslAction::List { verbose: true })
        .await
        .into_result()?;
    Ok(parse_list_verbose(&text))
}

/// Poll the verbose list until `distro` is no longer `Running`.
///
/// Intervals follow [`Timings::backoff`]. Failed list calls count as "still
/// running" and are retried until the overall bound.
///
/// # Errors
///
/// `Timeout` once `timings.stop_timeout()` has elapsed.
pub async fn wait_until_stopped(
    runner: &impl ActionRunner,
    distro: &str,
    timings: &Timings,
) -> Result<(), DistroError> {
    let deadline = Instant::now() + timings.stop_timeout();
    let mut intervals = timings.backoff();
    loop {
        match list_distros(runner).await {
            Ok(entries) if !is_running(&entries, distro) => return Ok(()),
            Ok(_) => tracing::debug!(distro, "still running"),
            Err(err) => tracing::debug!(distro, error = %err, "list failed while waiting"),
        }
        let now = Instant::now();
        if now >= deadline {
            return Err(DistroError::Timeout {
                name: distro.to_string(),
                what: "stop",
                secs: timings.stop_timeout_secs,
            });
        }
        let pause = intervals.next().unwrap_or_default().min(deadline - now);
        tokio::time::sleep(pause).await;
    }
}

/// Where a distribution keeps its virtual disk.
///
/// # Errors
///
/// `NotRegistered` or `RegistryLookup`.
pub fn install_location(
    registry: &impl RegistryReader,
    distro: &str,
) -> Result<PathBuf, DistroError> {
    Ok(registry::lookup(registry, distro)?.base_path)
}

/// Sample CPU, memory and disk usage for `distro`.
///
/// CPU and memory are sampled concurrently; the CPU figure spans
/// `timings.cpu_sample_gap()`.
///
/// # Errors
///
/// Process failures, malformed `/proc` output and registry or filesystem
/// errors for the disk figure.
pub async fn get_metrics(
    runner: &impl ActionRunner,
    registry: &impl RegistryReader,
    disk: &impl DiskProbe,
    distro: &str,
    memory_limit_gb: u32,
    timings: &Timings,
) -> Result<MetricsSnapshot, DistroError> {
    let (cpu, mem) = tokio::join!(
        sample_cpu(runner, distro, timings),
        sample_mem(runner, distro)
    );
    let cpu_percent = cpu?;
    let mem = mem?;

    let record = registry::lookup(registry, distro)?;
    let backing = record.backing_file();
    let disk_used_bytes = disk.file_size(&backing)?;
    let disk_total_bytes = disk.volume_total(&backing).unwrap_or(0);

    Ok(MetricsSnapshot {
        cpu_percent,
        mem_used_gb: mem.used_gb(),
        mem_total_gb: f64::from(memory_limit_gb),
        disk_used_bytes,
        disk_total_bytes,
    })
}

async fn sample_cpu(
    runner: &impl ActionRunner,
    distro: &str,
    timings: &Timings,
) -> Result<f64, DistroError> {
    let read = || async {
        let text = runner
            .run_action(WslAction::CpuSample { distro })
            .await
            .into_result()?;
        CpuCounters::parse(&text)
    };
    let before = read().await?;
    tokio::time::sleep(timings.cpu_sample_gap()).await;
    let after = read().await?;
    Ok(cpu_usage(before, after))
}

async fn sample_mem(runner: &impl ActionRunner, distro: &str) -> Result<MemInfo, DistroError> {
    let text = runner
        .run_action(WslAction::MemSample { distro })
        .await
        .into_result()?;
    MemInfo::parse(&text)
}

/// Launch `distro` in the background.
///
/// # Errors
///
/// Fails with the tool's output if the start command fails.
pub async fn start(runner: &impl ActionRunner, distro: &str) -> Result<(), DistroError> {
    runner
        .run_action(WslAction::Start { distro })
        .await
        .into_result()
        .map(drop)
}

/// Stop every distribution and the WSL utility VM.
///
/// # Errors
///
/// Fails with the tool's output if the shutdown command fails.
pub async fn shutdown(runner: &impl ActionRunner) -> Result<(), DistroError> {
    runner
        .run_action(WslAction::GlobalShutdown)
        .await
        .into_result()
        .map(drop)
}

/// Installed WSL package version, or [`UNKNOWN_VERSION`].
pub async fn wsl_version(runner: &impl ActionRunner) -> String {
    let out = runner.run_action(WslAction::Version).await;
    parse_wsl_version(&out.text()).unwrap_or_else(|| UNKNOWN_VERSION.to_string())
}
