//! Argument parsing, read-only commands and error reporting.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Binary with colors off, a throwaway config and no usable `wsl.exe`.
pub fn wslhub() -> (Command, TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("wslhub"));
    cmd.env("NO_COLOR", "1")
        .env("WSLHUB_CONFIG", dir.path().join("config.yaml"))
        .env("WSLHUB_WSL", "wslhub-test-no-such-wsl")
        .env_remove("RUST_LOG");
    (cmd, dir)
}

fn json_stdout(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

// --- Help and version ---

#[test]
fn test_cli_no_args_shows_help() {
    let (mut cmd, _dir) = wslhub();
    cmd.assert().code(2).stderr(predicate::str::contains(
        "Install, migrate and monitor WSL distributions",
    ));
}

#[test]
fn test_help_lists_commands_but_hides_action() {
    let (mut cmd, _dir) = wslhub();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("install"))
        .stdout(predicate::str::contains("migrate"))
        .stdout(predicate::str::contains("uninstall"))
        .stdout(predicate::str::contains("metrics"))
        .stdout(predicate::str::contains("_action").not());
}

#[test]
fn test_version_flag_shows_name() {
    let (mut cmd, _dir) = wslhub();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("wslhub"));
}

#[test]
fn test_version_command_falls_back_to_unknown_wsl() {
    let (mut cmd, _dir) = wslhub();
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("wslhub 0.1.0"))
        .stdout(predicate::str::contains("WSL Unknown"));
}

#[test]
fn test_version_command_json() {
    let (mut cmd, _dir) = wslhub();
    let output = cmd.args(["version", "--json"]).output().expect("run");
    assert!(output.status.success());
    let json = json_stdout(&output);
    assert_eq!(json["version"], "0.1.0");
    assert_eq!(json["wsl"], "Unknown");
}

// --- Catalog ---

#[test]
fn test_catalog_json_lists_verified_images() {
    let (mut cmd, _dir) = wslhub();
    let output = cmd.args(["catalog", "--json"]).output().expect("run");
    assert!(output.status.success());
    let json = json_stdout(&output);
    let entries = json.as_array().expect("array");
    let ubuntu = entries
        .iter()
        .find(|e| e["name"] == "Ubuntu-24.04")
        .expect("Ubuntu-24.04 listed");
    let sha = ubuntu["sha256"].as_str().expect("sha256");
    assert_eq!(sha.len(), 64);
    assert!(sha.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
}

#[test]
fn test_catalog_human_lists_names() {
    let (mut cmd, _dir) = wslhub();
    cmd.arg("catalog")
        .assert()
        .success()
        .stdout(predicate::str::contains("Debian"))
        .stdout(predicate::str::contains("https://"));
}

// --- _action ---

#[test]
fn test_unknown_action_is_unregistered() {
    let (mut cmd, _dir) = wslhub();
    cmd.args(["_action", "bogus"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unregistered action: bogus"));
}

#[test]
fn test_unknown_action_json_error_code() {
    let (mut cmd, _dir) = wslhub();
    let output = cmd.args(["_action", "bogus", "--json"]).output().expect("run");
    assert!(!output.status.success());
    let json = json_stdout(&output);
    assert_eq!(json["error"], true);
    assert_eq!(json["code"], "unregistered_action");
}

#[test]
fn test_action_with_wrong_arity_shows_usage() {
    let (mut cmd, _dir) = wslhub();
    cmd.args(["_action", "export", "Ubuntu"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("usage: _action export <distro> <archive>"));
}

// --- Commands that need wsl.exe ---

#[test]
fn test_list_without_wsl_reports_spawn_failure() {
    let (mut cmd, _dir) = wslhub();
    let output = cmd.args(["list", "--json"]).output().expect("run");
    assert!(!output.status.success());
    assert_eq!(json_stdout(&output)["code"], "process_spawn");
}

#[test]
fn test_install_rejects_path_like_name() {
    let (mut cmd, _dir) = wslhub();
    cmd.args(["install", "../evil", "--json"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("distribution-error"))
        .stdout(predicate::str::contains("not a valid distribution name"));
}

#[test]
fn test_uninstall_rejects_path_like_name() {
    let (mut cmd, _dir) = wslhub();
    cmd.args(["uninstall", "..\\evil", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a valid distribution name"));
}

#[test]
fn test_migrate_failure_is_reported_as_migration_done() {
    let (mut cmd, dir) = wslhub();
    let output = cmd
        .args(["migrate", "Arch"])
        .arg(dir.path().join("Arch"))
        .args(["--yes", "--json"])
        .output()
        .expect("run");
    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let done: serde_json::Value = stdout
        .lines()
        .filter_map(|l| serde_json::from_str::<serde_json::Value>(l).ok())
        .find(|v| v["topic"] == "migration-done")
        .expect("migration-done event");
    assert_eq!(done["payload"]["status"], "failed");
    assert!(done["payload"]["error"]
        .as_str()
        .expect("error text")
        .starts_with("terminate: "));
    assert!(!dir.path().join("Arch").exists());
}
