//! Share locks between independent handles
//!
//! Win32 enforces share modes when a file is opened. Unix has no such
//! concept, so the same contract is emulated with whole-file advisory locks
//! (`flock(2)`) taken non-blocking right after open:
//!
//! | requested          | lock taken | coexists with        |
//! |--------------------|------------|----------------------|
//! | `ShareMode::Shared`    | shared     | other shared holders |
//! | `ShareMode::Exclusive` | exclusive  | nothing              |
//!
//! Locks belong to the open file description, so they are released when the
//! owning `File` is dropped. On Windows [`try_lock`] is a no-op because the
//! share mode was already passed to `CreateFileW` by [`crate::open`].

use crate::error::{lock_error, would_block_error, Result};
use std::fs::File;
use std::io;
use std::path::Path;

/// How an open handle shares its target with other handles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShareMode {
    /// Other readers may open the target concurrently
    Shared,
    /// No other handle may open the target
    #[default]
    Exclusive,
}

/// Take the lock matching `mode` on `file` without blocking
///
/// # Errors
///
/// - `ExtendedError::WouldBlock` if another handle holds a conflicting lock
/// - `ExtendedError::Lock` if the lock call itself fails
#[cfg(unix)]
pub fn try_lock(file: &File, mode: ShareMode) -> Result<()> {
    let outcome = match mode {
        ShareMode::Shared => file.try_lock_shared(),
        ShareMode::Exclusive => file.try_lock(),
    };

    match outcome {
        Ok(()) => Ok(()),
        Err(std::fs::TryLockError::WouldBlock) => {
            Err(would_block_error(&format!("{mode:?} lock is held elsewhere")))
        }
        Err(std::fs::TryLockError::Error(e)) => Err(lock_error(&e.to_string())),
    }
}

/// Take the lock matching `mode` on `file` without blocking
///
/// # Errors
///
/// Never fails on Windows; conflicts surface from the open call instead.
#[cfg(windows)]
pub fn try_lock(_file: &File, _mode: ShareMode) -> Result<()> {
    Ok(())
}

/// Check whether some other handle currently holds a lock on `path`
///
/// Opens its own descriptor and probes with an exclusive lock, which is
/// dropped again before returning.
///
/// # Errors
///
/// Returns the open error if `path` cannot be opened for reading.
#[cfg(unix)]
pub fn is_locked_elsewhere(path: &Path) -> Result<bool> {
    let probe = File::open(path)?;
    match try_lock(&probe, ShareMode::Exclusive) {
        Ok(()) => Ok(false),
        Err(e) if e.is_conflict() => Ok(true),
        Err(e) => Err(e),
    }
}

/// Check whether some other handle currently holds `path` open
///
/// # Errors
///
/// Never fails on Windows; `DeleteFileW` reports sharing violations itself.
#[cfg(windows)]
pub fn is_locked_elsewhere(_path: &Path) -> Result<bool> {
    Ok(false)
}

/// Whether an OS error means another handle's share mode or lock refused us
#[must_use]
pub fn is_sharing_violation(err: &io::Error) -> bool {
    #[cfg(windows)]
    {
        use windows_sys::Win32::Foundation::{ERROR_LOCK_VIOLATION, ERROR_SHARING_VIOLATION};
        if let Some(code) = err.raw_os_error() {
            #[allow(clippy::cast_sign_loss)]
            let code = code as u32;
            if code == ERROR_SHARING_VIOLATION || code == ERROR_LOCK_VIOLATION {
                return true;
            }
        }
    }
    err.kind() == io::ErrorKind::WouldBlock
}
