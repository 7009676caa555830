//! Path binding
//!
//! Whether a handle targets a file or a directory is decided once, when the
//! path is bound: a trailing separator means "directory".

use std::path::{Path, PathBuf};

/// Kind of object a bound path refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    /// Regular file
    File,
    /// Directory
    Directory,
}

/// A path bound to a handle, tagged with its target kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathTarget {
    /// Path without a trailing separator
    File(PathBuf),
    /// Path that ended in a separator; stored without it
    Directory(PathBuf),
}

impl PathTarget {
    /// Bind `path`, deciding the target kind from its trailing separator
    ///
    /// # Examples
    ///
    /// ```rust
    /// use filehandle::{PathTarget, TargetKind};
    ///
    /// assert_eq!(PathTarget::parse("logs/").kind(), TargetKind::Directory);
    /// assert_eq!(PathTarget::parse("logs/app.log").kind(), TargetKind::File);
    /// ```
    pub fn parse(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let raw = path.as_os_str().to_string_lossy();
        let trimmed = raw.trim_end_matches(is_separator);

        if trimmed.len() == raw.len() {
            return Self::File(path.to_path_buf());
        }
        if trimmed.is_empty() {
            // "/" stays the root directory
            return Self::Directory(path.to_path_buf());
        }
        Self::Directory(PathBuf::from(trimmed))
    }

    /// The bound path, without any trailing separator
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::File(path) | Self::Directory(path) => path,
        }
    }

    /// Target kind
    #[must_use]
    pub const fn kind(&self) -> TargetKind {
        match self {
            Self::File(_) => TargetKind::File,
            Self::Directory(_) => TargetKind::Directory,
        }
    }

    /// Whether the target is a directory
    #[must_use]
    pub const fn is_directory(&self) -> bool {
        matches!(self, Self::Directory(_))
    }
}

fn is_separator(c: char) -> bool {
    c == '/' || (cfg!(windows) && c == '\\')
}
