//! Command implementations

pub mod catalog;
pub mod config;
pub mod info;
pub mod install;
pub mod internal;
pub mod list;
pub mod metrics;
pub mod migrate;
pub mod start;
pub mod uninstall;
pub mod version;

use anyhow::{Context, Result, bail};
use clap::Args;

use crate::app::AppContext;
use crate::domain::Credentials;

/// Account options shared by `install` and `migrate`.
#[derive(Args, Debug, Default)]
pub struct UserArgs {
    /// Default user to create inside the distribution
    #[arg(long, short)]
    pub user: Option<String>,

    /// Read the password from this environment variable instead of prompting
    #[arg(long, value_name = "VAR", requires = "user")]
    pub password_env: Option<String>,
}

impl UserArgs {
    /// Resolve the account to provision, prompting for the password when
    /// interactive.
    ///
    /// # Errors
    ///
    /// Returns an error if the password variable is unset, the prompt fails,
    /// a password is needed in non-interactive mode, or the account would
    /// not survive `chpasswd` intact.
    pub fn credentials(&self, app: &AppContext) -> Result<Option<Credentials>> {
        let Some(username) = self.user.clone() else {
            return Ok(None);
        };
        let password = if let Some(var) = &self.password_env {
            std::env::var(var).with_context(|| format!("environment variable {var} is not set"))?
        } else if app.non_interactive {
            bail!("--password-env is required with --user in non-interactive mode");
        } else {
            dialoguer::Password::new()
                .with_prompt(format!("Password for {username}"))
                .with_confirmation("Confirm password", "Passwords do not match")
                .interact()?
        };
        let creds = Credentials { username, password };
        creds.validate()?;
        Ok(Some(creds))
    }
}
