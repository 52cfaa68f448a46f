//! Application context: unified state passed to every command handler.
//!
//! `AppContext` is built once in `Cli::run()` from the global flags and the
//! loaded configuration. It owns the concrete port implementations; command
//! handlers borrow them and pass them to the application services.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::application::ports::ConfigStore;
use crate::application::services::locks::DistroLocks;
use crate::domain::{Catalog, WSL_EXE, WslHubConfig};
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::config::YamlConfigStore;
use crate::infra::disk::SysinfoDiskProbe;
use crate::infra::download::HttpDownloader;
use crate::infra::fs::StdFs;
use crate::infra::registry::WindowsRegistry;
use crate::infra::wsl::WslCli;
use crate::output::{OutputContext, Reporter};

/// Environment variable naming the management executable to run instead of
/// `wsl.exe`.
pub const WSL_PROGRAM_ENV: &str = "WSLHUB_WSL";

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
}

/// Behaviour flags.
pub struct BehaviourFlags {
    /// Skip interactive prompts (also set by `CI` / `WSLHUB_YES` env vars).
    pub yes: bool,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Output rendering options.
    pub output: OutputFlags,
    /// Behaviour options.
    pub behaviour: BehaviourFlags,
}

/// The `wsl.exe` runner used in production.
pub type Wsl = WslCli<TokioCommandRunner>;

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Configuration as loaded at startup.
    pub config: WslHubConfig,
    pub config_store: YamlConfigStore,
    pub catalog: Catalog,
    /// Shared so a migration task can own a handle.
    pub wsl: Arc<Wsl>,
    pub locks: DistroLocks,
    pub downloader: HttpDownloader,
    pub registry: WindowsRegistry,
    pub disk: SysinfoDiskProbe,
    pub fs: Arc<StdFs>,
    /// When `true`, skip interactive prompts and use defaults.
    pub non_interactive: bool,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read.
    pub fn new(flags: &AppFlags) -> Result<Self> {
        let ci_env = std::env::var("CI").is_ok() || std::env::var("WSLHUB_YES").is_ok();
        let non_interactive = flags.behaviour.yes || ci_env;

        let mode = if flags.output.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };

        let config_store = YamlConfigStore::default();
        let config = config_store.load().context("cannot load configuration")?;

        let program = std::env::var(WSL_PROGRAM_ENV).unwrap_or_else(|_| WSL_EXE.to_string());
        let runner = TokioCommandRunner::new(config.timings.command_timeout());
        tracing::debug!(%program, timeout_secs = config.timings.command_timeout_secs, "wsl runner");

        Ok(Self {
            output: OutputContext::new(flags.output.no_color, flags.output.quiet),
            mode,
            config,
            config_store,
            catalog: Catalog::builtin(),
            wsl: Arc::new(WslCli::with_program(runner, &program)),
            locks: DistroLocks::new(),
            downloader: HttpDownloader::new(),
            registry: WindowsRegistry,
            disk: SysinfoDiskProbe,
            fs: Arc::new(StdFs),
            non_interactive,
        })
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Event renderer for the current output mode.
    #[must_use]
    pub fn reporter(&self) -> Reporter {
        Reporter::new(&self.output, self.is_json())
    }

    /// Where `name` is installed or migrated to.
    ///
    /// An explicit path wins, then `install.root/<name>`, then `~/WSL/<name>`.
    ///
    /// # Errors
    ///
    /// Returns an error if no path is given and the home directory is unknown.
    pub fn install_dir(&self, name: &str, explicit: Option<PathBuf>) -> Result<PathBuf> {
        if let Some(path) = explicit {
            return Ok(path);
        }
        if let Some(root) = &self.config.install.root {
            return Ok(root.join(name));
        }
        let home = dirs::home_dir().context("cannot determine home directory")?;
        Ok(home.join("WSL").join(name))
    }

    /// Ask the user for confirmation.
    ///
    /// When `non_interactive` is `true` (CI, `--yes` flag, or `WSLHUB_YES` env),
    /// returns `default` immediately without prompting.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails (e.g. no TTY available).
    pub fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.non_interactive {
            return Ok(default);
        }
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?;
        Ok(confirmed)
    }
}
