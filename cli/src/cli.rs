//! CLI argument parsing with clap derive

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags, BehaviourFlags, OutputFlags};
use crate::commands;

/// Install, migrate and monitor WSL distributions
#[derive(Parser)]
#[command(
    name = "wslhub",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Skip confirmation prompts
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// Log debug details to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Download and register a distribution from the catalog
    Install(commands::install::InstallArgs),

    /// Move a distribution's virtual disk to another directory
    Migrate(commands::migrate::MigrateArgs),

    /// Unregister a distribution and delete its disk
    Uninstall(commands::uninstall::UninstallArgs),

    /// List installed distributions
    List,

    /// Show CPU, memory and disk usage of a distribution
    Metrics(commands::metrics::MetricsArgs),

    /// Start a distribution
    Start(commands::start::StartArgs),

    /// Stop all distributions and the WSL VM
    Shutdown,

    /// Show where a distribution is stored
    Info(commands::info::InfoArgs),

    /// List distributions available for install
    Catalog,

    /// Manage configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),

    /// Show version
    Version,

    #[command(hide = true, name = "_action")]
    Action(commands::internal::ActionArgs),
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<ExitCode> {
        let Cli {
            json,
            quiet,
            no_color,
            yes,
            verbose: _,
            command,
        } = self;
        let app = AppContext::new(&AppFlags {
            output: OutputFlags {
                no_color,
                quiet,
                json,
            },
            behaviour: BehaviourFlags { yes },
        })?;

        match command {
            Command::Install(args) => commands::install::run(&app, args).await,
            Command::Migrate(args) => commands::migrate::run(&app, args).await,
            Command::Uninstall(args) => commands::uninstall::run(&app, &args).await,
            Command::List => commands::list::run(&app).await,
            Command::Metrics(args) => commands::metrics::run(&app, &args).await,
            Command::Start(args) => commands::start::run(&app, &args).await,
            Command::Shutdown => commands::start::shutdown(&app).await,
            Command::Info(args) => commands::info::run(&app, &args),
            Command::Catalog => commands::catalog::run(&app),
            Command::Config(cmd) => commands::config::run(&app, cmd),
            Command::Version => {
                commands::version::run(&app).await?;
                Ok(ExitCode::SUCCESS)
            }
            Command::Action(args) => commands::internal::run(&app, &args).await,
        }
    }
}
