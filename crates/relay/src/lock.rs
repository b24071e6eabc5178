//! A single-instance guard: an exclusive advisory lock on a well-known file,
//! held for the process lifetime so a second relay cannot bind the same
//! configured identity.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::error::{RelayError, Result};

pub struct InstanceLock {
    _file: File,
}

impl InstanceLock {
    /// Acquires the lock at `path`, creating parent directories and the file
    /// itself as needed. Returns [`RelayError::AlreadyRunning`] if another
    /// process already holds it.
    pub fn acquire(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).write(true).open(path)?;
        file.try_lock_exclusive().map_err(|_| RelayError::AlreadyRunning)?;
        Ok(Self { _file: file })
    }
}

#[must_use]
pub fn default_lock_path() -> PathBuf {
    let base = std::env::var_os("XDG_RUNTIME_DIR")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("TMPDIR").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("/tmp"));
    base.join("meshdesk-relayd.lock")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_on_the_same_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("relay.lock");
        let first = InstanceLock::acquire(&path).unwrap();
        let second = InstanceLock::acquire(&path);
        assert!(second.is_err());
        drop(first);
    }

    #[test]
    fn lock_is_released_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("relay.lock");
        {
            let _first = InstanceLock::acquire(&path).unwrap();
        }
        let second = InstanceLock::acquire(&path);
        assert!(second.is_ok());
    }
}
