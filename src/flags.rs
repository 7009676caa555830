//! Open-mode flags
//!
//! A handle is opened with a set of independently togglable capabilities and
//! hints. `READ` and `WRITE` decide what byte operations are allowed,
//! `SHARED_READ` decides whether other handles may read the same target
//! concurrently, and the two hints only influence OS caching.

use crate::error::{FileError, Result};
use bitflags::bitflags;
use fs_extended::{AccessHint, ShareMode};
use std::fmt;

bitflags! {
    /// Capabilities and hints requested when opening a handle
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FileFlags: u32 {
        /// Byte reads are allowed
        const READ            = 0b0_0001;
        /// Byte writes are allowed
        const WRITE           = 0b0_0010;
        /// Other handles may read the target while this one is open
        const SHARED_READ     = 0b0_0100;
        /// Forward-only access is expected
        const SEQUENTIAL_SCAN = 0b0_1000;
        /// Scattered access is expected
        const RANDOM_ACCESS   = 0b1_0000;
    }
}

impl FileFlags {
    /// Check that the set can be honored
    ///
    /// # Errors
    ///
    /// Returns `FileError::InvalidFlags` if neither `READ` nor `WRITE` is
    /// requested, or if both access hints are requested together.
    pub fn validate(self) -> Result<()> {
        if !self.intersects(Self::READ | Self::WRITE) {
            return Err(FileError::InvalidFlags(format!(
                "{self} requests neither READ nor WRITE"
            )));
        }
        if self.contains(Self::SEQUENTIAL_SCAN | Self::RANDOM_ACCESS) {
            return Err(FileError::InvalidFlags(
                "SEQUENTIAL_SCAN and RANDOM_ACCESS are mutually exclusive".to_string(),
            ));
        }
        Ok(())
    }

    /// Access pattern hint for the platform layer
    #[must_use]
    pub fn access_hint(self) -> AccessHint {
        if self.contains(Self::SEQUENTIAL_SCAN) {
            AccessHint::Sequential
        } else if self.contains(Self::RANDOM_ACCESS) {
            AccessHint::Random
        } else {
            AccessHint::Normal
        }
    }

    /// Share mode for the platform layer
    ///
    /// `SHARED_READ` only admits other readers, so a writable handle is
    /// always exclusive regardless of it.
    #[must_use]
    pub fn share_mode(self) -> ShareMode {
        if self.contains(Self::SHARED_READ) && !self.contains(Self::WRITE) {
            ShareMode::Shared
        } else {
            ShareMode::Exclusive
        }
    }
}

impl fmt::Display for FileFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("(none)");
        }
        bitflags::parser::to_writer(self, f)
    }
}
