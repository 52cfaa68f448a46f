//! Registry access for per-distribution WSL metadata.
//!
//! On Windows this reads `HKCU\Software\Microsoft\Windows\CurrentVersion\Lxss`
//! through `winreg`. Elsewhere every call reports the registry as
//! unavailable.

#[cfg(not(windows))]
use crate::application::ports::RegistryReader;
#[cfg(not(windows))]
use crate::domain::DistroError;

pub const LXSS_KEY: &str = r"Software\Microsoft\Windows\CurrentVersion\Lxss";

/// Production `RegistryReader`.
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowsRegistry;

#[cfg(windows)]
mod imp {
    use std::io;

    use winreg::RegKey;
    use winreg::enums::HKEY_CURRENT_USER;

    use super::{LXSS_KEY, WindowsRegistry};
    use crate::application::ports::RegistryReader;
    use crate::domain::DistroError;

    fn lookup_err(what: &str, err: &io::Error) -> DistroError {
        DistroError::RegistryLookup(format!("{what}: {err}"))
    }

    fn open(path: &str) -> Result<RegKey, DistroError> {
        RegKey::predef(HKEY_CURRENT_USER)
            .open_subkey(path)
            .map_err(|e| lookup_err(&format!("cannot open HKCU\\{path}"), &e))
    }

    /// Missing values are `None`; other errors propagate.
    fn optional<T>(res: io::Result<T>, value: &str) -> Result<Option<T>, DistroError> {
        match res {
            Ok(v) => Ok(Some(v)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(lookup_err(&format!("cannot read {value}"), &e)),
        }
    }

    impl RegistryReader for WindowsRegistry {
        fn distro_keys(&self) -> Result<Vec<String>, DistroError> {
            open(LXSS_KEY)?
                .enum_keys()
                .map(|k| k.map_err(|e| lookup_err("cannot enumerate distributions", &e)))
                .collect()
        }

        fn read_string(&self, subkey: &str, value: &str) -> Result<Option<String>, DistroError> {
            let key = open(&format!("{LXSS_KEY}\\{subkey}"))?;
            optional(key.get_value::<String, _>(value), value)
        }

        fn read_u32(&self, subkey: &str, value: &str) -> Result<Option<u32>, DistroError> {
            let key = open(&format!("{LXSS_KEY}\\{subkey}"))?;
            optional(key.get_value::<u32, _>(value), value)
        }
    }
}

#[cfg(not(windows))]
impl RegistryReader for WindowsRegistry {
    fn distro_keys(&self) -> Result<Vec<String>, DistroError> {
        Err(unavailable())
    }

    fn read_string(&self, _: &str, _: &str) -> Result<Option<String>, DistroError> {
        Err(unavailable())
    }

    fn read_u32(&self, _: &str, _: &str) -> Result<Option<u32>, DistroError> {
        Err(unavailable())
    }
}

#[cfg(not(windows))]
fn unavailable() -> DistroError {
    DistroError::RegistryLookup("the Windows registry is not available on this platform".into())
}
