//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod action;
pub mod catalog;
pub mod classify;
pub mod config;
pub mod distro;
pub mod error;
pub mod metrics;
pub mod sanitize;

pub use action::{ActionKind, WSL_EXE, WslAction};
pub use catalog::{Catalog, ImageCatalogEntry, hex_encode, normalize_digest};
pub use classify::{Outcome, RuleMatch, match_rules, resolve_listed};
pub use config::{Timings, WslHubConfig, validate_config_key, validate_config_value};
pub use distro::{
    ArtifactKind, Credentials, DistroRecord, OperationRequest, parse_default_user,
    parse_list_verbose, parse_wsl_version, validate_distro_name,
};
pub use error::{ConfigError, DistroError};
pub use sanitize::sanitize;
