//! Per-distribution exclusive operation lock.
//!
//! Install, migrate and uninstall take the lock for their whole run. Names
//! compare case-insensitively, matching how WSL treats them. A second
//! operation on a held name fails immediately with `Busy`. Released names
//! leave the table, so it only holds names with a live operation.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::OwnedMutexGuard;

use crate::domain::DistroError;

type Slot = Arc<tokio::sync::Mutex<()>>;
type Table = Arc<Mutex<HashMap<String, Slot>>>;

/// Shared lock table. Cloning shares the table.
#[derive(Debug, Clone, Default)]
pub struct DistroLocks {
    inner: Table,
}

/// Held for the duration of one operation; dropping it releases the name.
#[derive(Debug)]
pub struct DistroGuard {
    name: String,
    key: String,
    table: Table,
    _guard: OwnedMutexGuard<()>,
}

impl Drop for DistroGuard {
    fn drop(&mut self) {
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        // Two references: the table entry and our own guard. A third means a
        // concurrent `try_acquire` is about to find the slot taken.
        if table
            .get(&self.key)
            .is_some_and(|slot| Arc::strong_count(slot) == 2)
        {
            table.remove(&self.key);
        }
    }
}

impl DistroGuard {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl DistroLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the lock for `name` without waiting.
    ///
    /// # Errors
    ///
    /// `Busy` if another operation holds the same name.
    pub fn try_acquire(&self, name: &str) -> Result<DistroGuard, DistroError> {
        let key = name.to_lowercase();
        let slot = {
            let mut table = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(table.entry(key.clone()).or_default())
        };
        let guard = slot
            .try_lock_owned()
            .map_err(|_| DistroError::Busy(name.to_string()))?;
        tracing::debug!(distro = name, "operation lock acquired");
        Ok(DistroGuard {
            name: name.to_string(),
            key,
            table: Arc::clone(&self.inner),
            _guard: guard,
        })
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
