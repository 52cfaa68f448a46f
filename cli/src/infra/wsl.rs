//! `ActionRunner` backed by `wsl.exe`.
//!
//! Merges stdout and stderr into one buffer and turns spawn failures,
//! timeouts and non-zero exits into `DistroError`s. Output text is never
//! inspected here; classification is the application layer's job.

use std::io;

use crate::application::ports::{ActionOutput, ActionRunner, CommandRunner};
use crate::domain::{DistroError, WSL_EXE, WslAction, sanitize};

pub struct WslCli<R> {
    runner: R,
    program: String,
}

impl<R: CommandRunner> WslCli<R> {
    #[must_use]
    pub fn new(runner: R) -> Self {
        Self::with_program(runner, WSL_EXE)
    }

    /// Use a different executable, e.g. a stub in tests.
    #[must_use]
    pub fn with_program(runner: R, program: &str) -> Self {
        Self {
            runner,
            program: program.to_string(),
        }
    }
}

impl<R: CommandRunner> ActionRunner for WslCli<R> {
    async fn run_action(&self, action: WslAction<'_>) -> ActionOutput {
        let kind = action.kind();
        let args = action.args();
        let stdin = action.stdin();
        tracing::debug!(?action, "wsl action");

        let result = self.runner.run(&self.program, &args, stdin.as_deref()).await;
        match result {
            Ok(out) => {
                let mut raw = out.stdout;
                raw.extend_from_slice(&out.stderr);
                let error = (!out.status.success()).then(|| DistroError::ProcessExecution {
                    action: kind.name(),
                    status: out.status.to_string(),
                    output: sanitize(&raw),
                });
                if let Some(err) = &error {
                    tracing::debug!(action = kind.name(), error = %err, "wsl action failed");
                }
                ActionOutput { kind, raw, error }
            }
            Err(err) if err.kind() == io::ErrorKind::TimedOut => ActionOutput {
                kind,
                raw: Vec::new(),
                error: Some(DistroError::ProcessTimeout {
                    action: kind.name(),
                    secs: self.runner.timeout().as_secs(),
                }),
            },
            Err(source) => ActionOutput {
                kind,
                raw: Vec::new(),
                error: Some(DistroError::ProcessSpawn {
                    action: kind.name(),
                    source,
                }),
            },
        }
    }
}
