//! # fs-extended
//!
//! Synchronous platform layer underneath `filehandle`:
//! - `fadvise`: access-pattern hints (sequential / random)
//! - `lock`: advisory share locks emulating Win32 share modes on Unix
//! - `open`: platform open flags (share mode, hint flags, directory handles)
//! - `metadata`: creation / last-write / last-access timestamps
//!
//! Every `cfg(unix)` / `cfg(windows)` branch the handle needs lives here, so
//! the handle itself is written once against this API.
//!
//! ## Example
//!
//! ```rust,no_run
//! use fs_extended::fadvise::{apply_hint, AccessHint};
//! use fs_extended::lock::{try_lock, ShareMode};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let file = std::fs::File::open("data.bin")?;
//! try_lock(&file, ShareMode::Shared)?;
//! apply_hint(&file, AccessHint::Sequential)?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod fadvise;
pub mod lock;
pub mod metadata;
pub mod open;

// Re-export main types
pub use error::{ExtendedError, Result};
pub use fadvise::AccessHint;
pub use lock::ShareMode;
pub use metadata::Timestamps;
pub use open::OpenConfig;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
