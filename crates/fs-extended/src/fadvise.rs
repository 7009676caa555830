//! Access-pattern hints
//!
//! ## Platform Support
//!
//! **Linux**: `posix_fadvise(2)` over the whole file after open.
//!
//! **Windows**: hints are open-time flags (`FILE_FLAG_SEQUENTIAL_SCAN`,
//! `FILE_FLAG_RANDOM_ACCESS`), so they are applied by [`crate::open`] and
//! [`apply_hint`] is a no-op.
//!
//! **macOS and other Unix**: `posix_fadvise` is not available; [`apply_hint`]
//! is a no-op. Hints never change correctness, only caching behavior.

use crate::error::Result;
#[cfg(target_os = "linux")]
use crate::error::fadvise_error;
use std::fs::File;
#[cfg(target_os = "linux")]
use std::os::unix::io::AsRawFd;

/// Expected access pattern for an open file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessHint {
    /// No particular pattern (default)
    #[default]
    Normal,
    /// Data will be read front to back
    Sequential,
    /// Data will be accessed at scattered offsets
    Random,
}

#[cfg(target_os = "linux")]
impl AccessHint {
    /// Convert to the underlying POSIX constant
    fn to_posix(self) -> libc::c_int {
        match self {
            AccessHint::Normal => libc::POSIX_FADV_NORMAL,
            AccessHint::Sequential => libc::POSIX_FADV_SEQUENTIAL,
            AccessHint::Random => libc::POSIX_FADV_RANDOM,
        }
    }
}

/// Give the kernel advice about how `file` will be accessed
///
/// The advice covers the whole file (offset 0, length 0).
///
/// # Errors
///
/// Returns `ExtendedError::Fadvise` if the kernel rejects the advice, for
/// example on a descriptor that refers to a pipe.
#[cfg(target_os = "linux")]
pub fn apply_hint(file: &File, hint: AccessHint) -> Result<()> {
    if hint == AccessHint::Normal {
        return Ok(());
    }

    // SAFETY: the descriptor is owned by `file` and stays valid for the call.
    let ret = unsafe { libc::posix_fadvise(file.as_raw_fd(), 0, 0, hint.to_posix()) };

    // posix_fadvise returns the error number instead of setting errno
    if ret == 0 {
        Ok(())
    } else {
        let err = std::io::Error::from_raw_os_error(ret);
        Err(fadvise_error(&format!("{hint:?}: {err}")))
    }
}

/// Give the kernel advice about how `file` will be accessed
///
/// # Errors
///
/// Never fails on this platform.
#[cfg(not(target_os = "linux"))]
pub fn apply_hint(_file: &File, hint: AccessHint) -> Result<()> {
    log::trace!("access hint {hint:?} handled at open time or unsupported");
    Ok(())
}
