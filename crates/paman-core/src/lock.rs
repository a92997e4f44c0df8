//! Exclusive advisory lock on the database file.
//!
//! On Unix this is `flock(LOCK_EX)` on the already opened database handle, so
//! two `paman` processes inserting at the same time cannot both pass the
//! uniqueness check. Other targets get a no-op guard.

use crate::error::{PamanError, PamanResult};
use std::fs::File;
use std::path::Path;

/// Holds the lock until dropped.
#[derive(Debug)]
pub struct StoreLockGuard<'a> {
    file: &'a File,
}

impl<'a> StoreLockGuard<'a> {
    /// Blocks until the exclusive lock on `file` is held.
    pub fn acquire(file: &'a File, path: &Path) -> PamanResult<Self> {
        imp::lock_exclusive(file).map_err(|source| PamanError::Lock {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { file })
    }

    /// Returns `None` when another handle already holds the lock.
    pub fn try_acquire(file: &'a File, path: &Path) -> PamanResult<Option<Self>> {
        let locked = imp::try_lock_exclusive(file).map_err(|source| PamanError::Lock {
            path: path.to_path_buf(),
            source,
        })?;
        if locked {
            Ok(Some(Self { file }))
        } else {
            Ok(None)
        }
    }
}

impl Drop for StoreLockGuard<'_> {
    fn drop(&mut self) {
        if let Err(err) = imp::unlock(self.file) {
            tracing::warn!("failed to release store lock: {err}");
        }
    }
}

#[cfg(unix)]
mod imp {
    use std::fs::File;
    use std::io;
    use std::os::unix::io::AsRawFd;

    fn flock(file: &File, operation: libc::c_int) -> io::Result<()> {
        let result = unsafe { libc::flock(file.as_raw_fd(), operation) };
        if result == 0 {
            Ok(())
        } else {
            Err(io::Error::last_os_error())
        }
    }

    pub fn lock_exclusive(file: &File) -> io::Result<()> {
        flock(file, libc::LOCK_EX)
    }

    pub fn try_lock_exclusive(file: &File) -> io::Result<bool> {
        match flock(file, libc::LOCK_EX | libc::LOCK_NB) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == io::ErrorKind::WouldBlock => Ok(false),
            Err(err) => Err(err),
        }
    }

    pub fn unlock(file: &File) -> io::Result<()> {
        flock(file, libc::LOCK_UN)
    }
}

#[cfg(not(unix))]
mod imp {
    use std::fs::File;
    use std::io;

    pub fn lock_exclusive(_file: &File) -> io::Result<()> {
        Ok(())
    }

    pub fn try_lock_exclusive(_file: &File) -> io::Result<bool> {
        Ok(true)
    }

    pub fn unlock(_file: &File) -> io::Result<()> {
        Ok(())
    }
}
