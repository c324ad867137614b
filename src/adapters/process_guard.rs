use std::fs::{File, OpenOptions};
use std::path::Path;

use error_stack::{Report, ResultExt};
use fs2::FileExt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessGuardError {
    #[error("Another instance already holds the lock")]
    AlreadyRunning,
    #[error("Failed to open the lock file")]
    LockFile,
}

/// Host-wide mutual exclusion for the batch job: an exclusive advisory lock
/// on a well-known file. The lock is released when the guard drops or the
/// process dies, so a crashed run never wedges the next one.
#[derive(Debug)]
pub struct ProcessGuard {
    _lock_file: File,
}

impl ProcessGuard {
    pub fn acquire(path: &Path) -> error_stack::Result<Self, ProcessGuardError> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .change_context(ProcessGuardError::LockFile)
            .attach_printable_lazy(|| format!("lock path: {}", path.display()))?;

        match file.try_lock_exclusive() {
            Ok(()) => Ok(ProcessGuard { _lock_file: file }),
            Err(err)
                if err.raw_os_error() == fs2::lock_contended_error().raw_os_error() =>
            {
                Err(Report::new(ProcessGuardError::AlreadyRunning))
            }
            Err(err) => Err(Report::new(err).change_context(ProcessGuardError::LockFile)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_fails_while_held() {
        let dir = tempfile::tempdir().unwrap();
        let lock_path = dir.path().join("replicator.lock");

        let _guard = ProcessGuard::acquire(&lock_path).unwrap();
        let second = ProcessGuard::acquire(&lock_path);
        assert!(matches!(
            second.unwrap_err().current_context(),
            ProcessGuardError::AlreadyRunning
        ));
    }

    #[test]
    fn test_lock_is_released_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let lock_path = dir.path().join("replicator.lock");

        drop(ProcessGuard::acquire(&lock_path).unwrap());
        assert!(ProcessGuard::acquire(&lock_path).is_ok());
    }
}
