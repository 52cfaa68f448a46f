//! Application service: per-distribution registry lookup.

use crate::application::ports::RegistryReader;
use crate::domain::{DistroError, DistroRecord};

const NAME: &str = "DistributionName";
const BASE_PATH: &str = "BasePath";
const VHD_FILE: &str = "VhdFileName";
const RUN_OOBE: &str = "RunOOBE";

/// Default disk image name for WSL 2 distributions.
const DEFAULT_VHD: &str = "ext4.vhdx";

/// Find the record whose `DistributionName` equals `distro` exactly.
///
/// Subkeys are scanned in order and the first match wins.
///
/// # Errors
///
/// `NotRegistered` when no subkey matches; `RegistryLookup` when the hive
/// cannot be read or the match has no `BasePath`.
pub fn lookup(reader: &impl RegistryReader, distro: &str) -> Result<DistroRecord, DistroError> {
    for key in reader.distro_keys()? {
        if reader.read_string(&key, NAME)?.as_deref() != Some(distro) {
            continue;
        }
        let base = reader.read_string(&key, BASE_PATH)?.ok_or_else(|| {
            DistroError::RegistryLookup(format!("'{distro}' has no {BASE_PATH} value"))
        })?;
        let vhd = reader
            .read_string(&key, VHD_FILE)?
            .unwrap_or_else(|| DEFAULT_VHD.to_string());
        let run_oobe = reader.read_u32(&key, RUN_OOBE)?.unwrap_or(0) != 0;
        return Ok(DistroRecord::new(&base, &vhd, run_oobe));
    }
    Err(DistroError::NotRegistered(distro.to_string()))
}
