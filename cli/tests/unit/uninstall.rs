//! Uninstall: terminate, wait, unregister.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use wslhub_cli::application::services::locks::DistroLocks;
use wslhub_cli::application::services::uninstall::uninstall;
use wslhub_cli::domain::{ActionKind, Timings};

use crate::mocks::{FakeWsl, RecordingEvents, verbose_list};

#[tokio::test]
async fn uninstall_runs_steps_in_order() {
    let wsl = FakeWsl::new(|kind, _| match kind {
        ActionKind::List => Ok(verbose_list("Debian", "Stopped")),
        _ => Ok(String::new()),
    });
    let events = RecordingEvents::default();

    uninstall(&wsl, &events, &DistroLocks::new(), &Timings::immediate(), "Debian")
        .await
        .expect("uninstall");

    assert_eq!(
        wsl.calls(),
        vec![ActionKind::Terminate, ActionKind::List, ActionKind::Unregister]
    );
    assert_eq!(wsl.args_of(ActionKind::Unregister), vec!["--unregister", "Debian"]);
    assert!(events.topics().iter().all(|t| *t == "uninstall-progress"));
    assert_eq!(events.events().len(), 3);
}

#[tokio::test]
async fn unregister_failure_carries_sanitized_output() {
    let wsl = FakeWsl::new(|kind, _| match kind {
        ActionKind::List => Ok(String::new()),
        ActionKind::Unregister => Err("\u{1b}[31mThe operation timed out\r\n".to_string()),
        _ => Ok(String::new()),
    });

    let err = uninstall(
        &wsl,
        &RecordingEvents::default(),
        &DistroLocks::new(),
        &Timings::immediate(),
        "Debian",
    )
    .await
    .unwrap_err();

    let msg = err.to_string();
    assert!(msg.contains("[31mThe operation timed out"));
    assert!(!msg.contains('\u{1b}'));
    assert!(!msg.contains('\r'));
}

#[tokio::test]
async fn invalid_name_is_rejected_before_any_command() {
    let wsl = FakeWsl::new(|_, _| Ok(String::new()));

    let err = uninstall(
        &wsl,
        &RecordingEvents::default(),
        &DistroLocks::new(),
        &Timings::immediate(),
        "../etc",
    )
    .await
    .unwrap_err();

    assert_eq!(err.code(), "invalid_name");
    assert!(wsl.calls().is_empty());
}
