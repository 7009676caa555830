//! File timestamps

use crate::error::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use fs_extended::Timestamps;
use std::fs::Metadata;
use std::time::SystemTime;

/// Point-in-time snapshot of a target's timestamps
///
/// Nothing is cached: every query against a handle produces a fresh snapshot,
/// so two snapshots taken around a read may differ in `last_access` only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileTimes {
    /// When the target was created
    pub creation: SystemTime,
    /// When the contents were last written
    pub last_write: SystemTime,
    /// When the target was last accessed
    pub last_access: SystemTime,
}

impl FileTimes {
    /// Snapshot the times recorded in `metadata`
    ///
    /// # Errors
    ///
    /// Returns a platform error if the OS reports no timestamps.
    pub fn from_metadata(metadata: &Metadata) -> Result<Self> {
        Ok(Timestamps::from_metadata(metadata)?.into())
    }

    /// One-line RFC 3339 rendering for display
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "created {} | written {} | accessed {}",
            rfc3339(self.creation),
            rfc3339(self.last_write),
            rfc3339(self.last_access)
        )
    }
}

impl From<Timestamps> for FileTimes {
    fn from(stamps: Timestamps) -> Self {
        Self {
            creation: stamps.created,
            last_write: stamps.modified,
            last_access: stamps.accessed,
        }
    }
}

fn rfc3339(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).to_rfc3339_opts(SecondsFormat::Nanos, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_summary_format() {
        let epoch = SystemTime::UNIX_EPOCH;
        let times = FileTimes {
            creation: epoch,
            last_write: epoch + Duration::from_secs(60),
            last_access: epoch + Duration::new(3600, 5),
        };

        assert_eq!(
            times.summary(),
            "created 1970-01-01T00:00:00.000000000Z | \
             written 1970-01-01T00:01:00.000000000Z | \
             accessed 1970-01-01T01:00:00.000000005Z"
        );
    }

    #[test]
    fn test_from_timestamps() {
        let epoch = SystemTime::UNIX_EPOCH;
        let stamps = Timestamps {
            created: epoch,
            modified: epoch + Duration::from_secs(1),
            accessed: epoch + Duration::from_secs(2),
        };

        let times = FileTimes::from(stamps);
        assert_eq!(times.creation, epoch);
        assert!(times.last_access > times.last_write);
    }
}
