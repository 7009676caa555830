//! Error types for platform operations

use std::io;
use thiserror::Error;

/// Result alias for platform operations
pub type Result<T> = std::result::Result<T, ExtendedError>;

/// Errors raised by the platform layer
#[derive(Debug, Error)]
pub enum ExtendedError {
    /// Another handle holds a conflicting lock or share mode
    #[error("lock conflict: {0}")]
    WouldBlock(String),

    /// Lock operation failed for a reason other than a conflict
    #[error("lock failed: {0}")]
    Lock(String),

    /// Access hint could not be applied
    #[error("fadvise failed: {0}")]
    Fadvise(String),

    /// Metadata could not be read or converted
    #[error("metadata error: {0}")]
    Metadata(String),

    /// Raw I/O failure
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ExtendedError {
    /// Whether this error reports a conflicting holder rather than a hard failure
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::WouldBlock(_))
    }
}

/// Build a lock conflict error
#[must_use]
pub fn would_block_error(msg: &str) -> ExtendedError {
    ExtendedError::WouldBlock(msg.to_string())
}

/// Build a lock failure error
#[must_use]
pub fn lock_error(msg: &str) -> ExtendedError {
    ExtendedError::Lock(msg.to_string())
}

/// Build an fadvise error
#[must_use]
pub fn fadvise_error(msg: &str) -> ExtendedError {
    ExtendedError::Fadvise(msg.to_string())
}

/// Build a metadata error
#[must_use]
pub fn metadata_error(msg: &str) -> ExtendedError {
    ExtendedError::Metadata(msg.to_string())
}
