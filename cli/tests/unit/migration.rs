//! Migration task: step order, archive cleanup, cancellation and locking.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::path::Path;
use std::sync::Arc;

use wslhub_cli::application::services::locks::DistroLocks;
use wslhub_cli::application::services::migrate::{MigrationDeps, MigrationHandle, spawn_migration};
use wslhub_cli::domain::{ActionKind, Credentials, DistroError, OperationRequest, Timings};
use wslhub_common::{CompletionStatus, Event};

use crate::mocks::{FakeWsl, MockFs, RecordingEvents, verbose_list};

const NAME: &str = "Arch";

fn request(credentials: Option<Credentials>) -> OperationRequest {
    OperationRequest {
        name: NAME.to_string(),
        install_dir: Path::new("/mnt/d/WSL/Arch").to_path_buf(),
        credentials,
        download_threads: None,
    }
}

fn stopped_machine() -> FakeWsl {
    FakeWsl::new(|kind, _| match kind {
        ActionKind::QueryDefaultUserConfig => Ok("[user]\ndefault=dev\n".to_string()),
        ActionKind::List => Ok(verbose_list(NAME, "Stopped")),
        _ => Ok(String::new()),
    })
}

struct Run {
    wsl: Arc<FakeWsl>,
    events: Arc<RecordingEvents>,
    fs: Arc<MockFs>,
    locks: DistroLocks,
}

impl Run {
    fn new(wsl: FakeWsl, fs: MockFs) -> Self {
        Self {
            wsl: Arc::new(wsl),
            events: Arc::new(RecordingEvents::default()),
            fs: Arc::new(fs),
            locks: DistroLocks::new(),
        }
    }

    fn spawn(&self, req: OperationRequest) -> Result<MigrationHandle, DistroError> {
        let deps = MigrationDeps {
            runner: Arc::clone(&self.wsl),
            events: Arc::clone(&self.events),
            fs: Arc::clone(&self.fs),
            locks: self.locks.clone(),
            timings: Timings::immediate(),
        };
        spawn_migration(deps, req)
    }

    fn done(&self) -> (CompletionStatus, Option<String>) {
        match self.events.last() {
            Some(Event::MigrationDone(c)) => (c.status, c.error),
            other => panic!("last event is not migration-done: {other:?}"),
        }
    }
}

fn archive_is_cleaned_up() -> MockFs {
    let mut fs = MockFs::new();
    fs.expect_create_dir_all().times(1).returning(|_| Ok(()));
    fs.expect_exists().returning(|_| true);
    fs.expect_remove_file()
        .withf(|p| p.ends_with("Arch.tar"))
        .times(1)
        .returning(|_| Ok(()));
    fs
}

#[tokio::test]
async fn failed_export_removes_archive_and_never_unregisters() {
    let wsl = FakeWsl::new(|kind, _| match kind {
        ActionKind::List => Ok(verbose_list(NAME, "Stopped")),
        ActionKind::Export => Err("Export failed: there is not enough space on the disk\n".to_string()),
        _ => Ok(String::new()),
    });
    let run = Run::new(wsl, archive_is_cleaned_up());

    let err = run.spawn(request(None)).unwrap().wait().await.unwrap_err();

    assert_eq!(err.code(), "process_execution");
    assert!(!run.wsl.called(ActionKind::Unregister));
    assert!(!run.wsl.called(ActionKind::Import));
    let (status, error) = run.done();
    assert_eq!(status, CompletionStatus::Failed);
    assert!(error.unwrap().starts_with("export: "));
}

#[tokio::test]
async fn failed_import_after_unregister_removes_archive() {
    let wsl = FakeWsl::new(|kind, _| match kind {
        ActionKind::List => Ok(verbose_list(NAME, "Stopped")),
        ActionKind::Import => Err("Wsl/Service/RegisterDistro/E_FAIL: the disk is full\n".to_string()),
        _ => Ok(String::new()),
    });
    let run = Run::new(wsl, archive_is_cleaned_up());

    let err = run.spawn(request(None)).unwrap().wait().await.unwrap_err();

    assert_eq!(err.code(), "process_execution");
    assert!(run.wsl.called(ActionKind::Unregister));
    assert!(!run.wsl.called(ActionKind::Start));
    let (status, error) = run.done();
    assert_eq!(status, CompletionStatus::Failed);
    let error = error.unwrap();
    assert!(error.starts_with("import: "), "got: {error}");
    assert!(error.contains("disk is full"));
}

#[tokio::test]
async fn successful_migration_restores_previous_default_user() {
    let run = Run::new(stopped_machine(), archive_is_cleaned_up());

    run.spawn(request(None)).unwrap().wait().await.expect("migrate");

    assert_eq!(
        run.wsl.calls(),
        vec![
            ActionKind::QueryDefaultUserConfig,
            ActionKind::Terminate,
            ActionKind::List,
            ActionKind::Export,
            ActionKind::Unregister,
            ActionKind::Import,
            ActionKind::Start,
            ActionKind::SetDefaultUser,
            ActionKind::Stop,
        ]
    );
    assert!(run.wsl.args_of(ActionKind::SetDefaultUser).contains(&"dev".to_string()));
    let import = run.wsl.args_of(ActionKind::Import);
    assert!(import.iter().any(|a| a.ends_with("Arch.tar")));
    assert_eq!(run.done(), (CompletionStatus::Success, None));
}

#[tokio::test]
async fn credentials_replace_default_user_lookup() {
    let run = Run::new(stopped_machine(), archive_is_cleaned_up());
    let creds = Credentials {
        username: "alice".to_string(),
        password: "correct horse battery".to_string(),
    };

    run.spawn(request(Some(creds))).unwrap().wait().await.expect("migrate");

    assert!(!run.wsl.called(ActionKind::QueryDefaultUserConfig));
    assert!(run.wsl.called(ActionKind::CreateUser));
    assert!(run.wsl.called(ActionKind::GrantElevatedGroup));
}

#[tokio::test]
async fn missing_default_user_is_reported_not_fatal() {
    let wsl = FakeWsl::new(|kind, _| match kind {
        ActionKind::List => Ok(verbose_list(NAME, "Stopped")),
        _ => Ok(String::new()),
    });
    let run = Run::new(wsl, archive_is_cleaned_up());

    run.spawn(request(None)).unwrap().wait().await.expect("migrate");

    assert!(!run.wsl.called(ActionKind::SetDefaultUser));
    assert!(run.events.events().contains(&Event::MigrationProgress(
        "no default user to restore".to_string()
    )));
}

#[tokio::test]
async fn cancelled_before_first_step_touches_nothing() {
    // No filesystem expectations: any call would panic.
    let run = Run::new(stopped_machine(), MockFs::new());

    let handle = run.spawn(request(None)).unwrap();
    handle.cancel();
    let err = handle.wait().await.unwrap_err();

    assert!(matches!(err, DistroError::Cancelled(ref n) if n == NAME));
    assert!(!run.wsl.called(ActionKind::Terminate));
    assert_eq!(run.done().0, CompletionStatus::Failed);
}

#[tokio::test]
async fn second_migration_of_same_name_is_busy() {
    let run = Run::new(stopped_machine(), MockFs::new());

    let first = run.spawn(request(None)).unwrap();
    let err = run.spawn(request(None)).unwrap_err();
    assert_eq!(err.code(), "busy");

    first.cancel();
    assert!(first.wait().await.is_err());
}

#[tokio::test]
async fn distribution_that_never_stops_times_out() {
    let wsl = FakeWsl::new(|kind, _| match kind {
        ActionKind::List => Ok(verbose_list(NAME, "Running")),
        _ => Ok(String::new()),
    });
    let run = Run::new(wsl, MockFs::new());

    let err = run.spawn(request(None)).unwrap().wait().await.unwrap_err();

    assert!(matches!(err, DistroError::Timeout { what: "stop", .. }));
    assert!(!run.wsl.called(ActionKind::Export));
    assert!(run.done().1.unwrap().starts_with("wait-stopped: "));
}
