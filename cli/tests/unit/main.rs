//! Unit tests for wslhub CLI
//!
//! These tests use mocked ports and run fast without spawning `wsl.exe`.

mod config_store;
mod metrics;
mod migration;
mod mocks;
mod registry_lookup;
mod uninstall;
