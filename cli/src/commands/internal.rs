//! Internal command `_action`: run one `wsl.exe` action by name.
//!
//! Used to diagnose a single step of a pipeline in isolation, not by
//! ordinary users. Output is sanitized exactly as the pipelines see it.

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::ActionRunner;
use crate::domain::{ActionKind, Credentials, WslAction};

/// Environment variable holding the password for `set-password`.
pub const PASSWORD_ENV: &str = "WSLHUB_PASSWORD";

/// Arguments for `_action`.
#[derive(Args)]
pub struct ActionArgs {
    /// Action name, e.g. `list` or `cpu-sample`
    pub action: String,

    /// Positional parameters of the action
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub params: Vec<String>,
}

/// Run `wslhub _action <name> [params...]`.
///
/// # Errors
///
/// `UnregisteredAction` for unknown names, a usage error for the wrong number
/// of parameters, or the action's own failure.
pub async fn run(app: &AppContext, args: &ActionArgs) -> Result<ExitCode> {
    let kind: ActionKind = args.action.parse()?;
    let password = if kind == ActionKind::SetPassword {
        std::env::var(PASSWORD_ENV).with_context(|| format!("{PASSWORD_ENV} is not set"))?
    } else {
        String::new()
    };
    let action = build_action(kind, &args.params, &password)?;
    tracing::debug!(?action, "running single action");

    let text = app.wsl.run_action(action).await.into_result()?;
    print!("{text}");
    Ok(ExitCode::SUCCESS)
}

/// Bind positional parameters to the typed action for `kind`.
///
/// # Errors
///
/// Returns a usage error when the parameter count does not match, and
/// `InvalidCredentials` when a `set-password` account would split across
/// `chpasswd` lines.
pub fn build_action<'a>(
    kind: ActionKind,
    params: &'a [String],
    password: &'a str,
) -> Result<WslAction<'a>> {
    let p: Vec<&str> = params.iter().map(String::as_str).collect();
    let action = match (kind, p.as_slice()) {
        (ActionKind::List, &[]) => WslAction::List { verbose: false },
        (ActionKind::List, &["verbose" | "-v" | "--verbose"]) => WslAction::List { verbose: true },
        (ActionKind::Unregister, &[distro]) => WslAction::Unregister { distro },
        (ActionKind::Export, &[distro, archive]) => WslAction::Export {
            distro,
            archive: Path::new(archive),
        },
        (ActionKind::Terminate, &[distro]) => WslAction::Terminate { distro },
        (ActionKind::Import, &[distro, install_dir, artifact]) => WslAction::Import {
            distro,
            install_dir: Path::new(install_dir),
            artifact: Path::new(artifact),
        },
        (ActionKind::QueryDefaultUserConfig, &[distro]) => {
            WslAction::QueryDefaultUserConfig { distro }
        }
        (ActionKind::CreateUser, &[distro, user]) => WslAction::CreateUser { distro, user },
        (ActionKind::SetPassword, &[distro, user]) => {
            Credentials {
                username: user.to_string(),
                password: password.to_string(),
            }
            .validate()?;
            WslAction::SetPassword {
                distro,
                user,
                password,
            }
        }
        (ActionKind::GrantElevatedGroup, &[distro, user]) => {
            WslAction::GrantElevatedGroup { distro, user }
        }
        (ActionKind::SetDefaultUser, &[distro, user]) => WslAction::SetDefaultUser { distro, user },
        (ActionKind::Stop, &[distro]) => WslAction::Stop { distro },
        (ActionKind::Start, &[distro]) => WslAction::Start { distro },
        (ActionKind::Version, &[]) => WslAction::Version,
        (ActionKind::GlobalShutdown, &[]) => WslAction::GlobalShutdown,
        (ActionKind::CpuSample, &[distro]) => WslAction::CpuSample { distro },
        (ActionKind::MemSample, &[distro]) => WslAction::MemSample { distro },
        _ => bail!("usage: _action {kind} {}", usage(kind)),
    };
    Ok(action)
}

fn usage(kind: ActionKind) -> &'static str {
    match kind {
        ActionKind::List => "[verbose]",
        ActionKind::Export => "<distro> <archive>",
        ActionKind::Import => "<distro> <install-dir> <artifact>",
        ActionKind::CreateUser
        | ActionKind::SetPassword
        | ActionKind::GrantElevatedGroup
        | ActionKind::SetDefaultUser => "<distro> <user>",
        ActionKind::Version | ActionKind::GlobalShutdown => "(no parameters)",
        _ => "<distro>",
    }
}
