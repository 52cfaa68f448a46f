//! `wslhub install <name>`: download, verify and register a distribution.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::install::{InstallDeps, InstallOutcome, install};
use crate::commands::UserArgs;
use crate::domain::OperationRequest;

/// Arguments for the install command.
#[derive(Args)]
pub struct InstallArgs {
    /// Catalog name of the distribution (see `wslhub catalog`)
    pub name: String,

    /// Install directory [default: <install.root>/<name>]
    #[arg(long)]
    pub path: Option<PathBuf>,

    #[command(flatten)]
    pub user: UserArgs,
}

/// Run `wslhub install`.
///
/// Failures inside the pipeline are already reported on the event stream and
/// map to a failing exit code.
///
/// # Errors
///
/// Returns an error if the request cannot be assembled.
pub async fn run(app: &AppContext, args: InstallArgs) -> Result<ExitCode> {
    let install_dir = app.install_dir(&args.name, args.path)?;
    let credentials = args.user.credentials(app)?;
    let request = OperationRequest {
        name: args.name,
        install_dir,
        credentials,
        download_threads: None,
    };

    let reporter = app.reporter();
    let deps = InstallDeps {
        runner: app.wsl.as_ref(),
        downloader: &app.downloader,
        events: &reporter,
        catalog: &app.catalog,
        locks: &app.locks,
        timings: &app.config.timings,
    };
    let result = install(&deps, &request).await;
    reporter.finish();

    match result {
        Ok(outcome) => {
            if !app.is_json() {
                let name = &request.name;
                match outcome {
                    InstallOutcome::Installed { user_configured: true } => app
                        .output
                        .success(&format!("{name} installed in {}", request.install_dir.display())),
                    InstallOutcome::Installed { user_configured: false } => {
                        app.output
                            .success(&format!("{name} installed in {}", request.install_dir.display()));
                        app.output
                            .info(&format!("Run 'wsl -d {name}' to finish first-boot setup"));
                    }
                    InstallOutcome::UserConfigured => app
                        .output
                        .success(&format!("{name} was already installed; default user configured")),
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(_) => Ok(ExitCode::FAILURE),
    }
}
