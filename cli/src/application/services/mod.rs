//! Application services: use-case orchestration.
//!
//! Each service module implements a single use-case by composing domain logic
//! with port trait calls. Services import only from `crate::domain` and
//! `crate::application::ports`: never from `crate::infra`, `crate::commands`,
//! or `crate::output`.

pub mod classifier;
pub mod install;
pub mod locks;
pub mod migrate;
pub mod registry;
pub mod status;
pub mod uninstall;
pub mod user_setup;

#[cfg(test)]
pub(crate) mod test_support;
