//! File timestamps with platform fallbacks
//!
//! `std::fs::Metadata` already uses `statx(2)` on Linux and
//! `GetFileInformationByHandle` on Windows, so last-write and last-access are
//! always available. Birth time is not: older kernels and some filesystems
//! (tmpfs before 6.x, many network mounts) do not record it. In that case the
//! inode status-change time stands in for creation, so a query on an
//! existing target never fails.

use crate::error::{metadata_error, Result};
use std::fs::Metadata;
use std::time::SystemTime;
#[cfg(unix)]
use std::time::Duration;

/// Creation, last-write and last-access times of one filesystem object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamps {
    /// Birth time, or status-change time where birth time is not recorded
    pub created: SystemTime,
    /// Last content modification
    pub modified: SystemTime,
    /// Last access
    pub accessed: SystemTime,
}

impl Timestamps {
    /// Extract timestamps from `metadata`
    ///
    /// # Errors
    ///
    /// Returns `ExtendedError::Metadata` if the platform does not report
    /// modification or access times at all.
    pub fn from_metadata(metadata: &Metadata) -> Result<Self> {
        let modified = metadata
            .modified()
            .map_err(|e| metadata_error(&format!("last-write time unavailable: {e}")))?;
        let accessed = metadata
            .accessed()
            .map_err(|e| metadata_error(&format!("last-access time unavailable: {e}")))?;
        let created = match metadata.created() {
            Ok(created) => created,
            Err(e) => {
                log::trace!("birth time unavailable ({e}), using status-change time");
                status_change_time(metadata)?
            }
        };

        Ok(Self {
            created,
            modified,
            accessed,
        })
    }
}

/// Inode status-change time (`st_ctime`)
#[cfg(unix)]
fn status_change_time(metadata: &Metadata) -> Result<SystemTime> {
    use std::os::unix::fs::MetadataExt;

    let nanos = u32::try_from(metadata.ctime_nsec())
        .map_err(|e| metadata_error(&format!("Invalid ctime nanoseconds: {e}")))?;
    let secs = metadata.ctime();
    let time = if secs >= 0 {
        SystemTime::UNIX_EPOCH + Duration::new(secs.unsigned_abs(), nanos)
    } else {
        SystemTime::UNIX_EPOCH - Duration::new(secs.unsigned_abs(), 0) + Duration::new(0, nanos)
    };
    Ok(time)
}

#[cfg(windows)]
fn status_change_time(_metadata: &Metadata) -> Result<SystemTime> {
    Err(metadata_error("creation time unavailable"))
}
