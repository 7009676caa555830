//! # filehandle
//!
//! A stateful, synchronous file handle: one path, at most one open OS
//! resource, explicit capability flags, exact partial-read semantics and
//! uncached file-time queries.
//!
//! - [`FileHandle`]: open / create / read / write / seek / flush / close /
//!   delete, file times and length, whole-file reads
//! - [`FileFlags`]: `READ`, `WRITE`, `SHARED_READ`, `SEQUENTIAL_SCAN`,
//!   `RANDOM_ACCESS`
//! - [`PathTarget`]: a bound path tagged file or directory by its trailing
//!   separator
//! - [`FileTimes`]: creation, last-write and last-access snapshot
//!
//! Platform specifics (share locks, access hints, birth times) live in the
//! `fs_extended` crate.

pub mod cli;
pub mod commands;
pub mod error;
pub mod flags;
pub mod handle;
pub mod target;
pub mod times;

pub use error::{FileError, Result};
pub use flags::FileFlags;
pub use handle::FileHandle;
pub use target::{PathTarget, TargetKind};
pub use times::FileTimes;
