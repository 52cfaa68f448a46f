//! The closed vocabulary of `wsl.exe` invocations.
//!
//! Every action carries its own typed parameters and maps to exactly one
//! argument vector. Credentials are never spliced into a shell string: the
//! user name travels as a separate argument and the password on stdin.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::domain::error::DistroError;

/// Management executable shipped with Windows.
pub const WSL_EXE: &str = "wsl.exe";

/// Action names, used for logging, error tagging and text dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    List,
    Unregister,
    Export,
    Terminate,
    Import,
    QueryDefaultUserConfig,
    CreateUser,
    SetPassword,
    GrantElevatedGroup,
    SetDefaultUser,
    Stop,
    Start,
    Version,
    GlobalShutdown,
    CpuSample,
    MemSample,
}

impl ActionKind {
    pub const ALL: [ActionKind; 16] = [
        ActionKind::List,
        ActionKind::Unregister,
        ActionKind::Export,
        ActionKind::Terminate,
        ActionKind::Import,
        ActionKind::QueryDefaultUserConfig,
        ActionKind::CreateUser,
        ActionKind::SetPassword,
        ActionKind::GrantElevatedGroup,
        ActionKind::SetDefaultUser,
        ActionKind::Stop,
        ActionKind::Start,
        ActionKind::Version,
        ActionKind::GlobalShutdown,
        ActionKind::CpuSample,
        ActionKind::MemSample,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ActionKind::List => "list",
            ActionKind::Unregister => "unregister",
            ActionKind::Export => "export",
            ActionKind::Terminate => "terminate",
            ActionKind::Import => "import",
            ActionKind::QueryDefaultUserConfig => "query-default-user-config",
            ActionKind::CreateUser => "create-user",
            ActionKind::SetPassword => "set-password",
            ActionKind::GrantElevatedGroup => "grant-elevated-group",
            ActionKind::SetDefaultUser => "set-default-user",
            ActionKind::Stop => "stop",
            ActionKind::Start => "start",
            ActionKind::Version => "version",
            ActionKind::GlobalShutdown => "global-shutdown",
            ActionKind::CpuSample => "cpu-sample",
            ActionKind::MemSample => "mem-sample",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ActionKind {
    type Err = DistroError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActionKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| DistroError::UnregisteredAction(s.to_string()))
    }
}

/// A fully-parameterised `wsl.exe` invocation.
#[derive(Clone, Copy)]
pub enum WslAction<'a> {
    /// `-l -q`, or `--list --verbose` when `verbose`.
    List { verbose: bool },
    Unregister { distro: &'a str },
    Export { distro: &'a str, archive: &'a Path },
    Terminate { distro: &'a str },
    Import {
        distro: &'a str,
        install_dir: &'a Path,
        artifact: &'a Path,
    },
    QueryDefaultUserConfig { distro: &'a str },
    CreateUser { distro: &'a str, user: &'a str },
    SetPassword {
        distro: &'a str,
        user: &'a str,
        password: &'a str,
    },
    GrantElevatedGroup { distro: &'a str, user: &'a str },
    SetDefaultUser { distro: &'a str, user: &'a str },
    Stop { distro: &'a str },
    Start { distro: &'a str },
    Version,
    GlobalShutdown,
    CpuSample { distro: &'a str },
    MemSample { distro: &'a str },
}

impl WslAction<'_> {
    #[must_use]
    pub fn kind(&self) -> ActionKind {
        match self {
            WslAction::List { .. } => ActionKind::List,
            WslAction::Unregister { .. } => ActionKind::Unregister,
            WslAction::Export { .. } => ActionKind::Export,
            WslAction::Terminate { .. } => ActionKind::Terminate,
            WslAction::Import { .. } => ActionKind::Import,
            WslAction::QueryDefaultUserConfig { .. } => ActionKind::QueryDefaultUserConfig,
            WslAction::CreateUser { .. } => ActionKind::CreateUser,
            WslAction::SetPassword { .. } => ActionKind::SetPassword,
            WslAction::GrantElevatedGroup { .. } => ActionKind::GrantElevatedGroup,
            WslAction::SetDefaultUser { .. } => ActionKind::SetDefaultUser,
            WslAction::Stop { .. } => ActionKind::Stop,
            WslAction::Start { .. } => ActionKind::Start,
            WslAction::Version => ActionKind::Version,
            WslAction::GlobalShutdown => ActionKind::GlobalShutdown,
            WslAction::CpuSample { .. } => ActionKind::CpuSample,
            WslAction::MemSample { .. } => ActionKind::MemSample,
        }
    }

    /// Distribution this action targets, if any.
    #[must_use]
    pub fn distro(&self) -> Option<&str> {
        match *self {
            WslAction::List { .. } | WslAction::Version | WslAction::GlobalShutdown => None,
            WslAction::Unregister { distro }
            | WslAction::Export { distro, .. }
            | WslAction::Terminate { distro }
            | WslAction::Import { distro, .. }
            | WslAction::QueryDefaultUserConfig { distro }
            | WslAction::CreateUser { distro, .. }
            | WslAction::SetPassword { distro, .. }
            | WslAction::GrantElevatedGroup { distro, .. }
            | WslAction::SetDefaultUser { distro, .. }
            | WslAction::Stop { distro }
            | WslAction::Start { distro }
            | WslAction::CpuSample { distro }
            | WslAction::MemSample { distro } => Some(distro),
        }
    }

    /// Argument vector passed to [`WSL_EXE`].
    #[must_use]
    pub fn args(&self) -> Vec<String> {
        fn inside(distro: &str, cmd: &[&str]) -> Vec<String> {
            let mut v = vec!["-d".to_string(), distro.to_string(), "--".to_string()];
            v.extend(cmd.iter().map(|s| (*s).to_string()));
            v
        }
        fn owned(parts: &[&str]) -> Vec<String> {
            parts.iter().map(|s| (*s).to_string()).collect()
        }

        match *self {
            WslAction::List { verbose: false } => owned(&["-l", "-q"]),
            WslAction::List { verbose: true } => owned(&["--list", "--verbose"]),
            WslAction::Unregister { distro } => owned(&["--unregister", distro]),
            WslAction::Export { distro, archive } => {
                owned(&["--export", distro, &archive.to_string_lossy()])
            }
            WslAction::Terminate { distro } => owned(&["-t", distro]),
            WslAction::Import {
                distro,
                install_dir,
                artifact,
            } => owned(&[
                "--import",
                distro,
                &install_dir.to_string_lossy(),
                &artifact.to_string_lossy(),
                "--version",
                "2",
            ]),
            WslAction::QueryDefaultUserConfig { distro } => {
                inside(distro, &["sh", "-c", "grep -E '' /etc/wsl.conf"])
            }
            WslAction::CreateUser { distro, user } => {
                inside(distro, &["useradd", "-m", "-s", "/bin/bash", user])
            }
            WslAction::SetPassword { distro, .. } => inside(distro, &["chpasswd"]),
            WslAction::GrantElevatedGroup { distro, user } => {
                inside(distro, &["usermod", "-aG", "sudo", user])
            }
            WslAction::SetDefaultUser { distro, user } => inside(
                distro,
                &[
                    "sh",
                    "-c",
                    r#"printf "\n[user]\ndefault=%s\n" "$1" >> /etc/wsl.conf"#,
                    "sh",
                    user,
                ],
            ),
            WslAction::Stop { distro } => owned(&["--terminate", distro, "true"]),
            WslAction::Start { distro } => owned(&["-d", distro]),
            WslAction::Version => owned(&["--version"]),
            WslAction::GlobalShutdown => owned(&["--shutdown"]),
            WslAction::CpuSample { distro } => {
                inside(distro, &["sh", "-c", "head -n 1 /proc/stat"])
            }
            WslAction::MemSample { distro } => inside(
                distro,
                &["sh", "-c", "grep -E 'MemTotal|MemAvailable' /proc/meminfo"],
            ),
        }
    }

    /// Bytes written to the child's stdin, if the action needs any.
    #[must_use]
    pub fn stdin(&self) -> Option<Vec<u8>> {
        match *self {
            WslAction::SetPassword { user, password, .. } => {
                Some(format!("{user}:{password}\n").into_bytes())
            }
            _ => None,
        }
    }
}

impl fmt::Debug for WslAction<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("WslAction");
        s.field("kind", &self.kind());
        if let Some(distro) = self.distro() {
            s.field("distro", &distro);
        }
        s.finish_non_exhaustive()
    }
}
