//! `DiskProbe` backed by `std::fs` metadata and `sysinfo` volume listing.

use std::path::Path;

use sysinfo::Disks;

use crate::application::ports::DiskProbe;
use crate::domain::DistroError;

#[derive(Debug, Default, Clone, Copy)]
pub struct SysinfoDiskProbe;

impl DiskProbe for SysinfoDiskProbe {
    fn file_size(&self, path: &Path) -> Result<u64, DistroError> {
        std::fs::metadata(path)
            .map(|m| m.len())
            .map_err(|source| DistroError::Filesystem {
                context: "cannot stat",
                path: path.to_path_buf(),
                source,
            })
    }

    fn volume_total(&self, path: &Path) -> Option<u64> {
        let disks = Disks::new_with_refreshed_list();
        disks
            .iter()
            .filter(|d| path.starts_with(d.mount_point()))
            .max_by_key(|d| d.mount_point().as_os_str().len())
            .map(sysinfo::Disk::total_space)
    }
}
