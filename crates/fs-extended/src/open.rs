//! Platform-specific open flags
//!
//! On Windows the share mode and access hints are part of the open call
//! itself, and directories can only be opened with backup semantics. On Unix
//! the share mode and hints are applied after open (see [`crate::lock`] and
//! [`crate::fadvise`]), so [`OpenConfig::apply`] leaves the options untouched.

use crate::fadvise::AccessHint;
use crate::lock::ShareMode;
use std::fs::OpenOptions;

/// Platform extras for a single open call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OpenConfig {
    /// Share mode granted to other handles
    pub share: ShareMode,
    /// Expected access pattern
    pub hint: AccessHint,
    /// Whether the target is a directory
    pub directory: bool,
}

impl OpenConfig {
    /// Fold the platform extras into `options`
    #[cfg(windows)]
    pub fn apply(&self, options: &mut OpenOptions) {
        use std::os::windows::fs::OpenOptionsExt;
        use windows_sys::Win32::Storage::FileSystem::{
            FILE_FLAG_BACKUP_SEMANTICS, FILE_FLAG_RANDOM_ACCESS, FILE_FLAG_SEQUENTIAL_SCAN,
            FILE_SHARE_READ,
        };

        let share = match self.share {
            ShareMode::Shared => FILE_SHARE_READ,
            ShareMode::Exclusive => 0,
        };
        options.share_mode(share);

        let mut flags = match self.hint {
            AccessHint::Normal => 0,
            AccessHint::Sequential => FILE_FLAG_SEQUENTIAL_SCAN,
            AccessHint::Random => FILE_FLAG_RANDOM_ACCESS,
        };
        if self.directory {
            flags |= FILE_FLAG_BACKUP_SEMANTICS;
        }
        options.custom_flags(flags);
    }

    /// Fold the platform extras into `options`
    #[cfg(unix)]
    pub fn apply(&self, _options: &mut OpenOptions) {
        log::trace!(
            "share {:?} / hint {:?} applied after open on unix",
            self.share,
            self.hint
        );
    }
}
