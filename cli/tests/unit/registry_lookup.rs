//! Registry lookup over a mocked reader.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use wslhub_cli::application::services::registry::lookup;
use wslhub_cli::domain::DistroError;

use crate::mocks::{MockRegistry, registry_with};

#[test]
fn finds_record_by_exact_name() {
    let record = lookup(&registry_with("Ubuntu", r"C:\WSL\Ubuntu"), "Ubuntu").unwrap();
    assert_eq!(record.base_path.to_string_lossy(), r"C:\WSL\Ubuntu");
    assert_eq!(record.vhd_file_name, "ext4.vhdx");
    assert!(!record.run_oobe);
}

#[test]
fn name_match_is_case_sensitive() {
    let err = lookup(&registry_with("Ubuntu", r"C:\WSL\Ubuntu"), "ubuntu").unwrap_err();
    assert!(matches!(err, DistroError::NotRegistered(ref n) if n == "ubuntu"));
}

#[test]
fn explicit_vhd_and_oobe_flag_are_read() {
    let mut reg = MockRegistry::new();
    reg.expect_distro_keys().returning(|| Ok(vec!["{a}".to_string()]));
    reg.expect_read_string().returning(|_, value| {
        Ok(match value {
            "DistributionName" => Some("Kali".to_string()),
            "BasePath" => Some(r"E:\Kali".to_string()),
            "VhdFileName" => Some("kali.vhdx".to_string()),
            _ => None,
        })
    });
    reg.expect_read_u32().returning(|_, _| Ok(Some(1)));

    let record = lookup(&reg, "Kali").unwrap();

    assert_eq!(record.vhd_file_name, "kali.vhdx");
    assert!(record.run_oobe);
    assert!(record.backing_file().ends_with("kali.vhdx"));
}

#[test]
fn record_without_base_path_is_a_lookup_error() {
    let mut reg = MockRegistry::new();
    reg.expect_distro_keys().returning(|| Ok(vec!["{a}".to_string()]));
    reg.expect_read_string().returning(|_, value| {
        Ok((value == "DistributionName").then(|| "Kali".to_string()))
    });
    reg.expect_read_u32().never();

    let err = lookup(&reg, "Kali").unwrap_err();

    assert!(matches!(err, DistroError::RegistryLookup(_)));
}

#[test]
fn unreadable_hive_propagates() {
    let mut reg = MockRegistry::new();
    reg.expect_distro_keys()
        .returning(|| Err(DistroError::RegistryLookup("access denied".to_string())));

    let err = lookup(&reg, "Kali").unwrap_err();

    assert_eq!(err.to_string(), "registry lookup failed: access denied");
}
