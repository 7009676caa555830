//! Stateful file handle
//!
//! A [`FileHandle`] binds one path to at most one open OS resource. The
//! resource lives in a private `NativeFile` held in an `Option`: taking it
//! out and dropping it is the only way a resource is released, which covers
//! explicit `close`, reopening, rebinding, error paths and scope exit alike.
//!
//! # Reopening
//!
//! `open` / `create` on a handle that is already open release the current
//! resource first, then acquire the new one. If the new acquisition fails the
//! handle is left closed.
//!
//! # Share semantics
//!
//! Without `SHARED_READ` a handle claims its target exclusively; with it,
//! other `SHARED_READ` handles may open the same target. A handle opened with
//! `WRITE` is always exclusive. Conflicts surface as
//! [`FileError::Conflict`] from `open` / `create` and as
//! [`FileError::DeleteConflict`] from `delete`.
//!
//! # Usage
//!
//! ```rust,no_run
//! use filehandle::{FileFlags, FileHandle};
//!
//! # fn main() -> filehandle::Result<()> {
//! let mut out = FileHandle::with_path("out/data.bin");
//! out.create(FileFlags::WRITE)?;
//! out.write(b"hello")?;
//! out.flush()?;
//! out.close();
//!
//! let mut input = FileHandle::with_path("out/data.bin");
//! input.open(FileFlags::READ | FileFlags::SHARED_READ)?;
//! let mut buf = [0u8; 5];
//! input.read_exact(&mut buf)?;
//! assert_eq!(&buf, b"hello");
//! # Ok(())
//! # }
//! ```

use crate::error::{FileError, Result};
use crate::flags::FileFlags;
use crate::target::PathTarget;
use crate::times::FileTimes;
use fs_extended::fadvise::apply_hint;
use fs_extended::lock::{is_locked_elsewhere, is_sharing_violation, try_lock};
use fs_extended::OpenConfig;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

/// Largest offset accepted by [`FileHandle::set_pos`]
pub const MAX_POSITION: u64 = i64::MAX as u64;

/// How an open call treats the target on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Disposition {
    /// Target must already exist
    Existing,
    /// Target is created if absent and truncated if writable
    Create,
}

/// The single OS resource owned by an open handle
#[derive(Debug)]
struct NativeFile {
    file: File,
    flags: FileFlags,
    path: PathBuf,
    directory: bool,
}

impl NativeFile {
    fn open(target: &PathTarget, flags: FileFlags, disposition: Disposition) -> Result<Self> {
        let path = target.path();
        let directory = target.is_directory();
        let writable = flags.contains(FileFlags::WRITE);

        let mut options = OpenOptions::new();
        if directory {
            // Directories only ever open read-only; byte I/O is refused later
            options.read(true);
        } else {
            options
                .read(flags.contains(FileFlags::READ))
                .write(writable);
            if disposition == Disposition::Create && writable {
                // Truncation waits until the share lock is held
                options.create(true).truncate(false);
            }
        }

        OpenConfig {
            share: flags.share_mode(),
            hint: flags.access_hint(),
            directory,
        }
        .apply(&mut options);

        let file = options.open(path).map_err(|e| FileError::from_io(path, e))?;

        if !directory {
            try_lock(&file, flags.share_mode()).map_err(|e| FileError::from_lock(path, e))?;

            if disposition == Disposition::Create && writable {
                file.set_len(0).map_err(|e| FileError::from_io(path, e))?;
            }

            if let Err(e) = apply_hint(&file, flags.access_hint()) {
                warn!("Ignoring access hint for {}: {}", path.display(), e);
            }
        }

        Ok(Self {
            file,
            flags,
            path: path.to_path_buf(),
            directory,
        })
    }

    /// Fail unless byte I/O with `required` capability is allowed
    fn check_io(&self, required: FileFlags) -> Result<()> {
        if self.directory {
            return Err(FileError::IsDirectory {
                path: self.path.clone(),
            });
        }
        if !self.flags.contains(required) {
            return Err(FileError::CapabilityViolation { required });
        }
        Ok(())
    }

    fn io_error(&self, err: io::Error) -> FileError {
        FileError::from_io(&self.path, err)
    }
}

impl Drop for NativeFile {
    fn drop(&mut self) {
        trace!("Releasing handle on {}", self.path.display());
    }
}

/// A path plus at most one open OS resource for it
///
/// All operations block until the OS call completes. A handle is not shared
/// across threads; independent handles on the same path coordinate only
/// through their share flags.
#[derive(Debug, Default)]
pub struct FileHandle {
    target: Option<PathTarget>,
    native: Option<NativeFile>,
}

impl FileHandle {
    /// Create an unbound, closed handle
    #[must_use]
    pub const fn new() -> Self {
        Self {
            target: None,
            native: None,
        }
    }

    /// Create a closed handle bound to `path`
    ///
    /// The path is not touched; it does not need to exist.
    #[must_use]
    pub fn with_path(path: impl AsRef<Path>) -> Self {
        Self {
            target: Some(PathTarget::parse(path)),
            native: None,
        }
    }

    /// Rebind the handle to `path`, closing any open resource first
    pub fn set_file(&mut self, path: impl AsRef<Path>) {
        if let Some(native) = self.native.take() {
            debug!(
                "Closing {} before rebinding to {}",
                native.path.display(),
                path.as_ref().display()
            );
        }
        self.target = Some(PathTarget::parse(path));
    }

    /// The bound path, without any trailing separator
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.target.as_ref().map(PathTarget::path)
    }

    /// The bound target, including its kind
    #[must_use]
    pub const fn target(&self) -> Option<&PathTarget> {
        self.target.as_ref()
    }

    /// Whether an OS resource is currently held
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.native.is_some()
    }

    /// Flags the handle was opened with, while it is open
    #[must_use]
    pub fn flags(&self) -> Option<FileFlags> {
        self.native.as_ref().map(|native| native.flags)
    }

    /// Open the bound target, which must already exist
    ///
    /// # Errors
    ///
    /// - `FileError::NotBound` if no path is bound
    /// - `FileError::InvalidFlags` if `flags` cannot be honored
    /// - `FileError::NotFound` if the target does not exist
    /// - `FileError::Conflict` if another handle holds the target in a
    ///   conflicting share mode
    /// - `FileError::AccessDenied` / `FileError::Io` for other OS failures
    pub fn open(&mut self, flags: FileFlags) -> Result<()> {
        self.acquire(flags, Disposition::Existing)
    }

    /// Create the bound target (and missing parent directories), then open it
    ///
    /// A file target is truncated when `flags` contain `WRITE`; without
    /// `WRITE` an existing file is left as is. A directory target is created
    /// empty and opened read-only.
    ///
    /// # Errors
    ///
    /// Same as [`FileHandle::open`], except that a missing target is created
    /// instead of reported.
    pub fn create(&mut self, flags: FileFlags) -> Result<()> {
        flags.validate()?;
        let target = self.bound()?.clone();
        self.release_for_reopen();

        let path = target.path();
        if target.is_directory() {
            fs::create_dir_all(path).map_err(|e| FileError::from_io(path, e))?;
        } else {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| FileError::from_io(parent, e))?;
            }
            if !flags.contains(FileFlags::WRITE) {
                // An existing file is never opened for writing here
                match OpenOptions::new().write(true).create_new(true).open(path) {
                    Ok(_) => debug!("Created empty {}", path.display()),
                    Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {}
                    Err(e) => return Err(FileError::from_io(path, e)),
                }
            }
        }

        self.acquire(flags, Disposition::Create)
    }

    fn acquire(&mut self, flags: FileFlags, disposition: Disposition) -> Result<()> {
        flags.validate()?;
        let target = self.bound()?.clone();
        self.release_for_reopen();

        let native = NativeFile::open(&target, flags, disposition)?;
        debug!(
            "Opened {} ({:?}, {})",
            target.path().display(),
            disposition,
            flags
        );
        self.native = Some(native);
        Ok(())
    }

    fn release_for_reopen(&mut self) {
        if let Some(native) = self.native.take() {
            debug!("Reopening {}: releasing previous handle", native.path.display());
        }
    }

    /// Read until `buf` is full or end of file, returning the byte count
    ///
    /// Returns 0 at end of file, repeatedly. A count below `buf.len()` means
    /// end of file was reached and is not an error. The position advances by
    /// the returned count.
    ///
    /// # Errors
    ///
    /// - `FileError::NotOpen`, `FileError::IsDirectory`
    /// - `FileError::CapabilityViolation` if not opened with `READ`
    /// - `FileError::Io` if the OS read fails
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let native = self.native_mut()?;
        native.check_io(FileFlags::READ)?;

        let mut total = 0;
        while total < buf.len() {
            match native.file.read(&mut buf[total..]) {
                Ok(0) => break,
                Ok(n) => total += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(native.io_error(e)),
            }
        }
        Ok(total)
    }

    /// Read exactly `buf.len()` bytes
    ///
    /// On a short read the position still advances by the bytes that were
    /// available, and the error reports that count.
    ///
    /// # Errors
    ///
    /// - `FileError::ShortRead` if end of file comes first
    /// - everything [`FileHandle::read`] returns
    pub fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        let read = self.read(buf)?;
        if read < buf.len() {
            return Err(FileError::ShortRead {
                requested: buf.len(),
                read,
            });
        }
        Ok(())
    }

    /// Write all of `buf` at the current position
    ///
    /// Extends the file when writing past its end.
    ///
    /// # Errors
    ///
    /// - `FileError::NotOpen`, `FileError::IsDirectory`
    /// - `FileError::CapabilityViolation` if not opened with `WRITE`; nothing
    ///   is written in that case
    /// - `FileError::Io` if the OS write fails
    pub fn write(&mut self, buf: &[u8]) -> Result<()> {
        let native = self.native_mut()?;
        native.check_io(FileFlags::WRITE)?;
        native.file.write_all(buf).map_err(|e| native.io_error(e))
    }

    /// Move the cursor to absolute `offset`
    ///
    /// Seeking past the end is allowed; a later write fills the gap.
    ///
    /// # Errors
    ///
    /// - `FileError::InvalidPosition` if `offset` exceeds [`MAX_POSITION`]
    /// - `FileError::NotOpen`, `FileError::IsDirectory`
    pub fn set_pos(&mut self, offset: u64) -> Result<()> {
        if offset > MAX_POSITION {
            return Err(FileError::InvalidPosition { offset });
        }
        let native = self.native_mut()?;
        if native.directory {
            return Err(FileError::IsDirectory {
                path: native.path.clone(),
            });
        }
        native
            .file
            .seek(SeekFrom::Start(offset))
            .map_err(|e| native.io_error(e))?;
        Ok(())
    }

    /// Current cursor position
    ///
    /// # Errors
    ///
    /// - `FileError::NotOpen`
    /// - `FileError::Io` if the OS query fails
    pub fn position(&mut self) -> Result<u64> {
        let native = self.native_mut()?;
        native
            .file
            .stream_position()
            .map_err(|e| native.io_error(e))
    }

    /// Force written data to stable storage
    ///
    /// A no-op when closed, for directories, and for handles without `WRITE`.
    ///
    /// # Errors
    ///
    /// Returns `FileError::Io` if the OS sync fails.
    pub fn flush(&mut self) -> Result<()> {
        match self.native.as_mut() {
            Some(native) if !native.directory && native.flags.contains(FileFlags::WRITE) => {
                native.file.sync_all().map_err(|e| native.io_error(e))
            }
            _ => Ok(()),
        }
    }

    /// Release the OS resource; closing a closed handle does nothing
    pub fn close(&mut self) {
        if let Some(native) = self.native.take() {
            debug!("Closed {}", native.path.display());
        }
    }

    /// Remove the bound target from disk
    ///
    /// Closes this handle first. Directories are removed with their contents.
    ///
    /// # Errors
    ///
    /// - `FileError::NotBound`, `FileError::NotFound`
    /// - `FileError::DeleteConflict` if another handle holds the file
    /// - `FileError::AccessDenied` / `FileError::Io` for other OS failures
    pub fn delete(&mut self) -> Result<()> {
        let target = self.bound()?.clone();
        self.close();

        let path = target.path();
        let metadata = fs::symlink_metadata(path).map_err(|e| FileError::from_io(path, e))?;

        if metadata.is_dir() {
            fs::remove_dir_all(path).map_err(|e| delete_error(path, e))?;
            debug!("Deleted directory {}", path.display());
            return Ok(());
        }

        if metadata.is_file() {
            match is_locked_elsewhere(path) {
                Ok(true) => {
                    return Err(FileError::DeleteConflict {
                        path: path.to_path_buf(),
                    })
                }
                Ok(false) => {}
                Err(e) => trace!("Lock probe on {} failed: {}", path.display(), e),
            }
        }

        fs::remove_file(path).map_err(|e| delete_error(path, e))?;
        debug!("Deleted {}", path.display());
        Ok(())
    }

    /// Fresh snapshot of the target's creation, last-write and last-access times
    ///
    /// Uses the open resource when there is one, the bound path otherwise.
    ///
    /// # Errors
    ///
    /// - `FileError::NotBound`, `FileError::NotFound`
    /// - `FileError::Platform` if the OS reports no timestamps
    pub fn file_times(&self) -> Result<FileTimes> {
        let metadata = match &self.native {
            Some(native) => native.file.metadata().map_err(|e| native.io_error(e))?,
            None => {
                let path = self.bound()?.path();
                fs::metadata(path).map_err(|e| FileError::from_io(path, e))?
            }
        };
        FileTimes::from_metadata(&metadata)
    }

    /// Size of the target in bytes
    ///
    /// Queries the open resource, or the bound path while closed. Directories,
    /// missing targets and unbound handles report 0.
    #[must_use]
    pub fn len(&self) -> u64 {
        let metadata = match (&self.native, &self.target) {
            (Some(native), _) if native.directory => return 0,
            (Some(native), _) => native.file.metadata(),
            (None, Some(target)) => fs::metadata(target.path()),
            (None, None) => return 0,
        };
        metadata
            .ok()
            .filter(fs::Metadata::is_file)
            .map_or(0, |m| m.len())
    }

    /// Whether [`FileHandle::len`] is 0
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read the whole file at `path`
    ///
    /// Opens with `READ | SHARED_READ | SEQUENTIAL_SCAN`; the handle is
    /// released on every path out of this function.
    ///
    /// # Errors
    ///
    /// Everything [`FileHandle::open`] and [`FileHandle::read`] return.
    pub fn read_entire_file(path: impl AsRef<Path>) -> Result<Vec<u8>> {
        let mut handle = Self::with_path(path);
        handle.open(FileFlags::READ | FileFlags::SHARED_READ | FileFlags::SEQUENTIAL_SCAN)?;

        let capacity = usize::try_from(handle.len()).unwrap_or(0);
        let native = handle.native_mut()?;
        native.check_io(FileFlags::READ)?;

        let mut contents = Vec::with_capacity(capacity);
        native
            .file
            .read_to_end(&mut contents)
            .map_err(|e| native.io_error(e))?;
        Ok(contents)
    }

    /// Read the whole file at `path` as UTF-8
    ///
    /// # Errors
    ///
    /// Everything [`FileHandle::read_entire_file`] returns, plus `FileError::Io`
    /// with `InvalidData` if the contents are not UTF-8.
    pub fn read_entire_file_to_string(path: impl AsRef<Path>) -> Result<String> {
        let path = path.as_ref();
        let bytes = Self::read_entire_file(path)?;
        String::from_utf8(bytes).map_err(|e| FileError::Io {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidData, e),
        })
    }

    fn bound(&self) -> Result<&PathTarget> {
        self.target.as_ref().ok_or(FileError::NotBound)
    }

    fn native_mut(&mut self) -> Result<&mut NativeFile> {
        self.native.as_mut().ok_or(FileError::NotOpen)
    }
}

fn delete_error(path: &Path, err: io::Error) -> FileError {
    if is_sharing_violation(&err) {
        FileError::DeleteConflict {
            path: path.to_path_buf(),
        }
    } else {
        FileError::from_io(path, err)
    }
}
