//! Error types for file handle operations
//!
//! One variant per failure condition a caller may want to branch on. OS
//! errors are classified through [`FileError::from_io`] so that "missing",
//! "denied" and "held by another handle" stay distinguishable.

use crate::flags::FileFlags;
use fs_extended::lock::is_sharing_violation;
use fs_extended::ExtendedError;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, FileError>;

/// Failure of a single file handle operation
#[derive(Debug, Error)]
pub enum FileError {
    /// The handle has no path bound to it
    #[error("no path bound to handle")]
    NotBound,

    /// The operation needs an open handle
    #[error("handle is not open")]
    NotOpen,

    /// Target does not exist
    #[error("not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// The OS refused access to the target
    #[error("access denied: {}: {source}", path.display())]
    AccessDenied { path: PathBuf, source: io::Error },

    /// Another handle holds the target in a conflicting mode
    #[error("access conflict: {} is held by another handle", path.display())]
    Conflict { path: PathBuf },

    /// The handle was not opened with the capability the operation needs
    #[error("handle lacks {required} capability")]
    CapabilityViolation { required: FileFlags },

    /// Byte I/O attempted on a directory handle
    #[error("is a directory: {}", path.display())]
    IsDirectory { path: PathBuf },

    /// End of file reached before the requested byte count
    #[error("short read: requested {requested} bytes, got {read}")]
    ShortRead { requested: usize, read: usize },

    /// Position outside the supported range
    #[error("invalid position: {offset}")]
    InvalidPosition { offset: u64 },

    /// Flag combination cannot be honored
    #[error("invalid flags: {0}")]
    InvalidFlags(String),

    /// Target cannot be deleted while another handle holds it
    #[error("cannot delete {}: held open by another handle", path.display())]
    DeleteConflict { path: PathBuf },

    /// Any other OS failure
    #[error("I/O error on {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    /// Platform layer failure (hints, locks, timestamps)
    #[error(transparent)]
    Platform(#[from] ExtendedError),
}

impl FileError {
    /// Classify an OS error raised while operating on `path`
    #[must_use]
    pub fn from_io(path: &Path, err: io::Error) -> Self {
        let path = path.to_path_buf();
        if is_sharing_violation(&err) {
            return Self::Conflict { path };
        }
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound { path },
            io::ErrorKind::PermissionDenied => Self::AccessDenied { path, source: err },
            io::ErrorKind::IsADirectory => Self::IsDirectory { path },
            _ => Self::Io { path, source: err },
        }
    }

    /// Map a platform lock error on `path`, turning conflicts into [`FileError::Conflict`]
    #[must_use]
    pub fn from_lock(path: &Path, err: ExtendedError) -> Self {
        if err.is_conflict() {
            Self::Conflict {
                path: path.to_path_buf(),
            }
        } else {
            Self::Platform(err)
        }
    }

    /// Whether the error means the target does not exist
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Whether the error comes from another handle holding the target
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. } | Self::DeleteConflict { .. })
    }
}
