//! Metrics sampling through mocked wsl, registry and disk ports.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::atomic::{AtomicUsize, Ordering};

use wslhub_cli::application::services::status::{get_metrics, install_location};
use wslhub_cli::domain::{ActionKind, Timings};

use crate::mocks::{FakeWsl, MockDisk, MockRegistry, registry_with};

const GIB: u64 = 1024 * 1024 * 1024;

fn sampling_wsl(cpu_before: &'static str, cpu_after: &'static str) -> FakeWsl {
    let cpu_reads = AtomicUsize::new(0);
    FakeWsl::new(move |kind, _| match kind {
        ActionKind::CpuSample => Ok(if cpu_reads.fetch_add(1, Ordering::SeqCst) == 0 {
            cpu_before.to_string()
        } else {
            cpu_after.to_string()
        }),
        ActionKind::MemSample => {
            Ok("MemTotal:       16777216 kB\nMemAvailable:   14680064 kB\n".to_string())
        }
        _ => Ok(String::new()),
    })
}

fn disk() -> MockDisk {
    let mut disk = MockDisk::new();
    disk.expect_file_size()
        .withf(|p| p.ends_with("ext4.vhdx"))
        .returning(|_| Ok(5 * GIB));
    disk.expect_volume_total().returning(|_| Some(512 * GIB));
    disk
}

#[tokio::test]
async fn snapshot_combines_cpu_memory_and_disk() {
    // 1000 jiffies elapsed, 800 of them idle.
    let wsl = sampling_wsl("cpu  100 0 100 800 0 0 0", "cpu  200 0 200 1600 0 0 0");
    let registry = registry_with("Arch", r"\\?\D:\WSL\Arch");

    let snap = get_metrics(&wsl, &registry, &disk(), "Arch", 8, &Timings::immediate())
        .await
        .expect("metrics");

    assert!((snap.cpu_percent - 20.0).abs() < 1e-9);
    assert!((snap.mem_used_gb - 2.0).abs() < 1e-9);
    assert!((snap.mem_total_gb - 8.0).abs() < f64::EPSILON);
    assert_eq!(snap.disk_used_bytes, 5 * GIB);
    assert_eq!(snap.disk_total_bytes, 512 * GIB);
}

#[tokio::test]
async fn idle_interval_reports_zero_cpu() {
    let wsl = sampling_wsl("cpu 10 0 10 80", "cpu 10 0 10 80");
    let registry = registry_with("Arch", r"D:\WSL\Arch");

    let snap = get_metrics(&wsl, &registry, &disk(), "Arch", 4, &Timings::immediate())
        .await
        .expect("metrics");

    assert!(snap.cpu_percent.abs() < f64::EPSILON);
}

#[tokio::test]
async fn malformed_proc_stat_is_an_error() {
    let wsl = sampling_wsl("sh: head: not found", "sh: head: not found");
    let registry = MockRegistry::new();

    let err = get_metrics(&wsl, &registry, &MockDisk::new(), "Arch", 8, &Timings::immediate())
        .await
        .unwrap_err();

    assert_eq!(err.code(), "malformed_output");
}

#[tokio::test]
async fn unknown_distribution_has_no_disk_figures() {
    let wsl = sampling_wsl("cpu 1 1 1 1", "cpu 2 2 2 2");
    let registry = registry_with("Debian", r"D:\WSL\Debian");

    let err = get_metrics(&wsl, &registry, &MockDisk::new(), "Arch", 8, &Timings::immediate())
        .await
        .unwrap_err();

    assert_eq!(err.code(), "registry_lookup");
}

#[test]
fn install_location_strips_long_path_prefix() {
    let registry = registry_with("Arch", r"\\?\D:\WSL\Arch");
    let path = install_location(&registry, "Arch").unwrap();
    assert_eq!(path.to_string_lossy(), r"D:\WSL\Arch");
}
