//! Subcommand implementations
//!
//! Each command is a thin caller of the public [`FileHandle`] contract; the
//! binary only parses arguments and reports results.

use crate::cli::{collect_flags, Command, CompareConfig};
use crate::flags::FileFlags;
use crate::handle::FileHandle;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Result of reading two files in lockstep
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompareOutcome {
    /// Same read-count sequence and bytes until both hit end of file together
    Identical {
        /// Bytes compared from each file
        bytes: u64,
    },
    /// The files diverged in the chunk starting at `offset`
    Differ {
        /// Offset of the first chunk that differs
        offset: u64,
        /// Bytes returned from the first file for that chunk
        first_read: usize,
        /// Bytes returned from the second file for that chunk
        second_read: usize,
    },
}

/// Read `first` and `second` chunk by chunk through two independent handles
///
/// The first handle uses `READ | SHARED_READ | SEQUENTIAL_SCAN`, the second
/// `READ | RANDOM_ACCESS`, so the same file may be compared with itself only
/// if nothing else holds it.
///
/// # Errors
///
/// Returns an error if either file cannot be opened or read.
pub fn compare_files(first: &Path, second: &Path, chunk_size: usize) -> Result<CompareOutcome> {
    let mut a = FileHandle::with_path(first);
    let mut b = FileHandle::with_path(second);
    a.open(FileFlags::READ | FileFlags::SHARED_READ | FileFlags::SEQUENTIAL_SCAN)
        .with_context(|| format!("Failed to open {}", first.display()))?;
    b.open(FileFlags::READ | FileFlags::RANDOM_ACCESS)
        .with_context(|| format!("Failed to open {}", second.display()))?;

    let mut buf_a = vec![0u8; chunk_size];
    let mut buf_b = vec![0u8; chunk_size];
    let mut offset = 0u64;

    loop {
        let read_a = a.read(&mut buf_a)?;
        let read_b = b.read(&mut buf_b)?;

        if read_a != read_b || buf_a[..read_a] != buf_b[..read_b] {
            return Ok(CompareOutcome::Differ {
                offset,
                first_read: read_a,
                second_read: read_b,
            });
        }
        if read_a == 0 {
            return Ok(CompareOutcome::Identical { bytes: offset });
        }
        offset += read_a as u64;
    }
}

/// Every entry below `dir`, depth first, excluding `dir` itself
///
/// # Errors
///
/// Returns an error if the walk hits an unreadable entry or an entry without
/// a file name.
pub fn walk_tree(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1) {
        let entry = entry.with_context(|| format!("Failed to walk {}", dir.display()))?;
        if entry.file_name().is_empty() {
            anyhow::bail!("Entry without a file name: {}", entry.path().display());
        }
        entries.push(entry.into_path());
    }
    Ok(entries)
}

/// Create `path` with `flags`, creating missing parents
///
/// # Errors
///
/// Returns an error if the target cannot be created.
pub fn touch(path: &Path, flags: FileFlags) -> Result<()> {
    let mut handle = FileHandle::with_path(path);
    handle
        .create(flags)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    info!("Created {} ({})", path.display(), flags);
    Ok(())
}

/// Run one parsed subcommand, writing its output to `out`
///
/// Returns `false` when the command ran but found a negative result (files
/// differ), so the caller can pick an exit code.
///
/// # Errors
///
/// Returns an error if the underlying handle operation fails.
pub fn run(command: &Command, out: &mut impl Write) -> Result<bool> {
    debug!("Running {:?}", command);
    match command {
        Command::Cat { path } => {
            let contents = FileHandle::read_entire_file(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            out.write_all(&contents)?;
        }
        Command::Times { path } => {
            let handle = FileHandle::with_path(path);
            let times = handle
                .file_times()
                .with_context(|| format!("Failed to query times of {}", path.display()))?;
            writeln!(out, "{}", times.summary())?;
            writeln!(out, "length {}", handle.len())?;
        }
        Command::Compare(CompareConfig {
            first,
            second,
            chunk_size,
        }) => match compare_files(first, second, *chunk_size)? {
            CompareOutcome::Identical { bytes } => {
                writeln!(out, "identical ({bytes} bytes)")?;
            }
            CompareOutcome::Differ {
                offset,
                first_read,
                second_read,
            } => {
                writeln!(
                    out,
                    "differ in chunk at offset {offset} (read {first_read} vs {second_read} bytes)"
                )?;
                return Ok(false);
            }
        },
        Command::Tree { dir } => {
            for entry in walk_tree(dir)? {
                writeln!(out, "{}", entry.display())?;
            }
        }
        Command::Touch { path, flags } => touch(path, collect_flags(flags))?,
        Command::Rm { path } => {
            FileHandle::with_path(path)
                .delete()
                .with_context(|| format!("Failed to delete {}", path.display()))?;
        }
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::FlagArg;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_compare_identical_files() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let src = temp_dir.path().join("src.bin");
        let dst = temp_dir.path().join("dst.bin");
        let data: Vec<u8> = (0..5000u32).map(|i| (i % 251) as u8).collect();
        fs::write(&src, &data)?;
        fs::copy(&src, &dst)?;

        let outcome = compare_files(&src, &dst, 1024)?;
        assert_eq!(outcome, CompareOutcome::Identical { bytes: 5000 });

        Ok(())
    }

    #[test]
    fn test_compare_reports_first_differing_chunk() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let a = temp_dir.path().join("a.txt");
        let b = temp_dir.path().join("b.txt");
        fs::write(&a, b"aaaabbbbcccc")?;
        fs::write(&b, b"aaaabbbbXccc")?;

        let outcome = compare_files(&a, &b, 4)?;
        assert_eq!(
            outcome,
            CompareOutcome::Differ {
                offset: 8,
                first_read: 4,
                second_read: 4
            }
        );

        Ok(())
    }

    #[test]
    fn test_compare_reports_length_mismatch() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let a = temp_dir.path().join("a.txt");
        let b = temp_dir.path().join("b.txt");
        fs::write(&a, b"12345")?;
        fs::write(&b, b"123")?;

        let outcome = compare_files(&a, &b, 4)?;
        assert_eq!(
            outcome,
            CompareOutcome::Differ {
                offset: 0,
                first_read: 4,
                second_read: 3
            }
        );

        Ok(())
    }

    #[test]
    fn test_walk_tree_lists_nested_entries() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        fs::create_dir_all(temp_dir.path().join("a/b"))?;
        fs::write(temp_dir.path().join("a/b/leaf.txt"), b"leaf")?;

        let entries = walk_tree(temp_dir.path())?;
        assert_eq!(entries.len(), 3);
        assert!(entries.contains(&temp_dir.path().join("a/b/leaf.txt")));

        Ok(())
    }

    #[test]
    fn test_run_times_prints_length() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("t.txt");
        fs::write(&path, b"twelve bytes")?;

        let mut out = Vec::new();
        assert!(run(&Command::Times { path }, &mut out)?);
        let text = String::from_utf8(out)?;
        assert!(text.contains("created "));
        assert!(text.ends_with("length 12\n"));

        Ok(())
    }

    #[test]
    fn test_run_touch_then_rm() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("deep/er/file.txt");

        run(
            &Command::Touch {
                path: path.clone(),
                flags: vec![FlagArg::Write],
            },
            &mut Vec::new(),
        )?;
        assert!(path.is_file());

        run(&Command::Rm { path: path.clone() }, &mut Vec::new())?;
        assert!(!path.exists());

        Ok(())
    }
}
