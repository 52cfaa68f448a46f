//! Integration tests for wslhub CLI
//!
//! These tests spawn the actual binary and test end-to-end behavior. The
//! management executable is pointed at a program that does not exist, so
//! nothing here touches a real WSL installation.

mod cli_tests;
