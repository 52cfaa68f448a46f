//! Shared mock infrastructure for unit tests.
//!
//! `FakeWsl` answers every action from a closure and records the calls,
//! `RecordingEvents` keeps emitted events, `FakeDownloader` writes canned
//! bytes. Registry, disk and filesystem ports are `mockall` mocks.

#![allow(clippy::expect_used, dead_code)]

use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use mockall::mock;
use wslhub_cli::application::ports::{
    ActionOutput, ActionRunner, DiskProbe, EventSink, ImageDownloader, LocalFs, RegistryReader,
};
use wslhub_cli::domain::{ActionKind, DistroError, ImageCatalogEntry, WslAction, sanitize};
use wslhub_common::Event;

// ── wsl.exe ──────────────────────────────────────────────────────────────────

type Responder = dyn Fn(ActionKind, &[String]) -> Result<String, String> + Send + Sync;

/// `Ok(text)` is a zero exit with `text`, `Err(text)` a non-zero exit.
pub struct FakeWsl {
    respond: Box<Responder>,
    calls: Mutex<Vec<(ActionKind, Vec<String>)>>,
    missing: bool,
}

impl FakeWsl {
    pub fn new(
        respond: impl Fn(ActionKind, &[String]) -> Result<String, String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            respond: Box::new(respond),
            calls: Mutex::new(Vec::new()),
            missing: false,
        }
    }

    /// Every call fails to spawn, as when `wsl.exe` is not installed.
    pub fn missing() -> Self {
        Self {
            missing: true,
            ..Self::new(|_, _| Ok(String::new()))
        }
    }

    pub fn calls(&self) -> Vec<ActionKind> {
        self.calls
            .lock()
            .expect("lock")
            .iter()
            .map(|(k, _)| *k)
            .collect()
    }

    pub fn called(&self, kind: ActionKind) -> bool {
        self.calls().contains(&kind)
    }

    pub fn args_of(&self, kind: ActionKind) -> Vec<String> {
        self.calls
            .lock()
            .expect("lock")
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, a)| a.clone())
            .unwrap_or_default()
    }
}

impl ActionRunner for FakeWsl {
    async fn run_action(&self, action: WslAction<'_>) -> ActionOutput {
        let kind = action.kind();
        let args = action.args();
        let reply = (self.respond)(kind, &args);
        self.calls.lock().expect("lock").push((kind, args));
        if self.missing {
            return ActionOutput {
                kind,
                raw: Vec::new(),
                error: Some(DistroError::ProcessSpawn {
                    action: kind.name(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "wsl.exe not found"),
                }),
            };
        }
        match reply {
            Ok(text) => ActionOutput::ok(kind, text.into_bytes()),
            Err(text) => ActionOutput {
                kind,
                error: Some(DistroError::ProcessExecution {
                    action: kind.name(),
                    status: "exit code: 1".to_string(),
                    output: sanitize(text.as_bytes()),
                }),
                raw: text.into_bytes(),
            },
        }
    }
}

/// Verbose list with `name` in `state`.
pub fn verbose_list(name: &str, state: &str) -> String {
    format!("  NAME      STATE           VERSION\n* {name}    {state}         2\n")
}

// ── Events ───────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingEvents {
    events: Mutex<Vec<Event>>,
}

impl RecordingEvents {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().expect("lock").clone()
    }

    pub fn topics(&self) -> Vec<&'static str> {
        self.events().iter().map(Event::topic).collect()
    }

    pub fn last(&self) -> Option<Event> {
        self.events().last().cloned()
    }
}

impl EventSink for RecordingEvents {
    fn emit(&self, event: Event) {
        self.events.lock().expect("lock").push(event);
    }
}

// ── Downloader ───────────────────────────────────────────────────────────────

/// Writes `payload` to the destination and reports 0/50/100, or fails
/// with an integrity error without leaving a file.
pub struct FakeDownloader {
    pub payload: Vec<u8>,
    pub corrupt: bool,
    pub called: AtomicBool,
}

impl FakeDownloader {
    pub fn ok(payload: &[u8]) -> Self {
        Self {
            payload: payload.to_vec(),
            corrupt: false,
            called: AtomicBool::new(false),
        }
    }

    pub fn corrupt() -> Self {
        Self {
            payload: Vec::new(),
            corrupt: true,
            called: AtomicBool::new(false),
        }
    }

    pub fn was_called(&self) -> bool {
        self.called.load(Ordering::SeqCst)
    }
}

impl ImageDownloader for FakeDownloader {
    async fn download(
        &self,
        entry: &ImageCatalogEntry,
        dest: &Path,
        on_progress: &mut (dyn FnMut(u8) + Send),
    ) -> Result<(), DistroError> {
        self.called.store(true, Ordering::SeqCst);
        if self.corrupt {
            return Err(DistroError::Integrity {
                name: entry.name.clone(),
                expected: entry.sha256.clone(),
                actual: "00".repeat(32),
            });
        }
        for pct in [0, 50, 50, 100] {
            on_progress(pct);
        }
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent).expect("create dir");
        }
        std::fs::write(dest, &self.payload).expect("write image");
        Ok(())
    }
}

// ── mockall ports ────────────────────────────────────────────────────────────

mock! {
    pub Registry {}

    impl RegistryReader for Registry {
        fn distro_keys(&self) -> Result<Vec<String>, DistroError>;
        fn read_string(&self, subkey: &str, value: &str) -> Result<Option<String>, DistroError>;
        fn read_u32(&self, subkey: &str, value: &str) -> Result<Option<u32>, DistroError>;
    }
}

mock! {
    pub Disk {}

    impl DiskProbe for Disk {
        fn file_size(&self, path: &Path) -> Result<u64, DistroError>;
        fn volume_total(&self, path: &Path) -> Option<u64>;
    }
}

mock! {
    pub Fs {}

    impl LocalFs for Fs {
        fn create_dir_all(&self, path: &Path) -> Result<(), DistroError>;
        fn remove_file(&self, path: &Path) -> Result<(), DistroError>;
        fn exists(&self, path: &Path) -> bool;
    }
}

/// Registry holding one distribution `name` under `{guid}` at `base`.
pub fn registry_with(name: &'static str, base: &'static str) -> MockRegistry {
    let mut reg = MockRegistry::new();
    reg.expect_distro_keys()
        .returning(|| Ok(vec!["{other}".to_string(), "{guid}".to_string()]));
    reg.expect_read_string().returning(move |key, value| {
        Ok(match (key, value) {
            ("{other}", "DistributionName") => Some("docker-desktop".to_string()),
            ("{guid}", "DistributionName") => Some(name.to_string()),
            ("{guid}", "BasePath") => Some(base.to_string()),
            _ => None,
        })
    });
    reg.expect_read_u32().returning(|_, _| Ok(None));
    reg
}
