//! Filesystem infrastructure: implements `LocalFs` for pipeline artifacts.

use std::io;
use std::path::Path;

use crate::application::ports::LocalFs;
use crate::domain::DistroError;

/// Production filesystem implementation of `LocalFs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdFs;

impl LocalFs for StdFs {
    fn create_dir_all(&self, path: &Path) -> Result<(), DistroError> {
        std::fs::create_dir_all(path).map_err(|source| DistroError::Filesystem {
            context: "cannot create",
            path: path.to_path_buf(),
            source,
        })
    }

    fn remove_file(&self, path: &Path) -> Result<(), DistroError> {
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(DistroError::Filesystem {
                context: "cannot remove",
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}
