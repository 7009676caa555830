use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub mod fixtures;

/// Write `data` to `name` inside `dir` and return the full path
#[allow(dead_code)]
pub fn write_fixture(dir: &TempDir, name: &str, data: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, data).expect("Failed to write fixture");
    path
}

/// Path string for `name` inside `dir` with a trailing separator, i.e. a
/// directory target
#[allow(dead_code)]
pub fn dir_target(dir: &Path, name: &str) -> String {
    format!("{}{}", dir.join(name).display(), std::path::MAIN_SEPARATOR)
}
