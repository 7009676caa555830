//! Command-line interface definitions
//!
//! Arguments are grouped by the component that consumes them: each
//! subcommand owns its own arguments, and `OutputConfig` is shared.

use crate::flags::FileFlags;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Inspect and manipulate files through a stateful file handle
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Operation to run
    #[command(subcommand)]
    pub command: Command,

    /// Output and logging configuration
    #[command(flatten)]
    pub output: OutputConfig,
}

/// Subcommands, one per handle operation worth driving from a shell
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print a whole file to stdout
    Cat {
        /// File to read
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },

    /// Print creation, last-write and last-access times and the length
    Times {
        /// File or directory to query
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },

    /// Read two files in lockstep and report the first difference
    Compare(CompareConfig),

    /// List every entry below a directory
    Tree {
        /// Directory to walk
        #[arg(value_name = "DIR")]
        dir: PathBuf,
    },

    /// Create a file, or a directory when PATH ends in a separator
    Touch {
        /// Target to create (missing parents are created too)
        #[arg(value_name = "PATH")]
        path: PathBuf,

        /// Open flags, comma separated
        #[arg(long, value_delimiter = ',', default_value = "write")]
        flags: Vec<FlagArg>,
    },

    /// Delete a file or a directory tree
    Rm {
        /// Target to delete
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },
}

/// Largest `--chunk-size` accepted by `compare` (64 MiB)
pub const MAX_CHUNK_SIZE: usize = 64 * 1024 * 1024;

/// Lockstep comparison configuration
///
/// Used by: `commands::compare_files()`
#[derive(clap::Args, Debug, Clone)]
pub struct CompareConfig {
    /// First file, read with a sequential-scan hint
    #[arg(value_name = "FIRST")]
    pub first: PathBuf,

    /// Second file, read with a random-access hint
    #[arg(value_name = "SECOND")]
    pub second: PathBuf,

    /// Bytes requested per read from each file
    #[arg(long, default_value = "1024")]
    pub chunk_size: usize,
}

/// Output and logging configuration
///
/// Used by: `main()`, logging initialization
#[derive(clap::Args, Debug, Clone, Default)]
#[command(next_help_heading = "Output Options")]
pub struct OutputConfig {
    /// Verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress all output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

impl OutputConfig {
    /// Default log directive for the tracing filter
    #[must_use]
    pub const fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

/// One open flag as spelled on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum FlagArg {
    /// Allow reads
    Read,
    /// Allow writes
    Write,
    /// Let other readers open the target concurrently
    SharedRead,
    /// Hint forward-only access
    SequentialScan,
    /// Hint scattered access
    RandomAccess,
}

impl From<FlagArg> for FileFlags {
    fn from(arg: FlagArg) -> Self {
        match arg {
            FlagArg::Read => Self::READ,
            FlagArg::Write => Self::WRITE,
            FlagArg::SharedRead => Self::SHARED_READ,
            FlagArg::SequentialScan => Self::SEQUENTIAL_SCAN,
            FlagArg::RandomAccess => Self::RANDOM_ACCESS,
        }
    }
}

/// Fold command-line flags into one set
#[must_use]
pub fn collect_flags(args: &[FlagArg]) -> FileFlags {
    args.iter()
        .fold(FileFlags::empty(), |acc, &arg| acc | FileFlags::from(arg))
}

impl Args {
    /// Validate command-line arguments
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - Both --quiet and --verbose options are used
    /// - `compare` is given a zero chunk size or one above [`MAX_CHUNK_SIZE`]
    /// - `touch` is given a flag set that cannot be opened
    pub fn validate(&self) -> Result<()> {
        if self.output.quiet && self.output.verbose > 0 {
            anyhow::bail!("Cannot use both --quiet and --verbose options");
        }

        match &self.command {
            Command::Compare(config) if config.chunk_size == 0 => {
                anyhow::bail!("Chunk size must be greater than 0");
            }
            Command::Compare(config) if config.chunk_size > MAX_CHUNK_SIZE => {
                anyhow::bail!(
                    "Chunk size {} exceeds the maximum of {} bytes",
                    config.chunk_size,
                    MAX_CHUNK_SIZE
                );
            }
            Command::Touch { flags, .. } => {
                collect_flags(flags).validate()?;
            }
            _ => {}
        }

        Ok(())
    }
}
