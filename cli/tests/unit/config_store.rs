//! YAML config store round-trips through a temp file selected by
//! `WSLHUB_CONFIG`.

#![allow(clippy::expect_used, unsafe_code)]

use serial_test::serial;
use wslhub_cli::application::ports::ConfigStore;
use wslhub_cli::domain::WslHubConfig;
use wslhub_cli::domain::config::apply_config_value;
use wslhub_cli::infra::config::{CONFIG_ENV, YamlConfigStore};

struct EnvGuard;

impl EnvGuard {
    fn point_at(path: &std::path::Path) -> Self {
        // SAFETY: tests touching this variable are serialized.
        unsafe { std::env::set_var(CONFIG_ENV, path) };
        Self
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        // SAFETY: see `point_at`.
        unsafe { std::env::remove_var(CONFIG_ENV) };
    }
}

#[test]
#[serial]
fn missing_file_loads_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let _env = EnvGuard::point_at(&dir.path().join("config.yaml"));

    let config = YamlConfigStore::default().load().expect("load");

    assert_eq!(config, WslHubConfig::default());
    assert_eq!(config.memory.limit_gb, 8);
}

#[test]
#[serial]
fn saved_values_load_back() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("config.yaml");
    let _env = EnvGuard::point_at(&path);

    let mut config = WslHubConfig::default();
    apply_config_value(&mut config, "memory.limit_gb", "12").expect("limit");
    apply_config_value(&mut config, "timings.stop_timeout_secs", "60").expect("timeout");
    YamlConfigStore::default().save(&config).expect("save");

    assert_eq!(YamlConfigStore::default().path().expect("path"), path);
    let loaded = YamlConfigStore::default().load().expect("load");
    assert_eq!(loaded.memory.limit_gb, 12);
    assert_eq!(loaded.timings.stop_timeout_secs, 60);
    assert_eq!(loaded.timings.settle_secs, 2);
}

#[test]
#[serial]
fn partial_file_keeps_other_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "install:\n  root: /mnt/d/WSL\n").expect("write");
    let _env = EnvGuard::point_at(&path);

    let loaded = YamlConfigStore::default().load().expect("load");

    assert_eq!(
        loaded.install.root.as_deref(),
        Some(std::path::Path::new("/mnt/d/WSL"))
    );
    assert_eq!(loaded.timings.command_timeout_secs, 1800);
}

#[test]
#[serial]
fn malformed_file_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "memory: [not, a, map]\n").expect("write");
    let _env = EnvGuard::point_at(&path);

    assert!(YamlConfigStore::default().load().is_err());
}

#[cfg(unix)]
#[test]
#[serial]
fn saved_file_is_private() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.yaml");
    let _env = EnvGuard::point_at(&path);

    YamlConfigStore::default().save(&WslHubConfig::default()).expect("save");

    let mode = std::fs::metadata(&path).expect("stat").permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
#[serial]
fn explicit_path_ignores_env_and_leaves_no_temp_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let _env = EnvGuard::point_at(&dir.path().join("elsewhere.yaml"));
    let path = dir.path().join("config.yaml");
    let store = YamlConfigStore::at(&path);

    let mut config = WslHubConfig::default();
    apply_config_value(&mut config, "install.root", "/mnt/d/WSL").expect("root");
    store.save(&config).expect("save");
    store.save(&config).expect("save over existing file");

    assert!(path.exists());
    assert!(!dir.path().join("elsewhere.yaml").exists());
    assert!(!dir.path().join("config.yaml.tmp").exists());
    assert_eq!(store.load().expect("load"), config);
}
