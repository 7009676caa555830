//! Independent handles on the same path
//!
//! Coordination between handles comes only from `SHARED_READ`; these tests
//! pin down which combinations coexist and which conflict.

mod common;

use common::fixtures::{banner_text, byte_ramp};
use common::write_fixture;
use filehandle::commands::{compare_files, CompareOutcome};
use filehandle::{FileError, FileFlags, FileHandle};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_shared_readers_coexist() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let path = write_fixture(&temp_dir, "shared.txt", b"shared contents");

    let mut a = FileHandle::with_path(&path);
    let mut b = FileHandle::with_path(&path);
    a.open(FileFlags::READ | FileFlags::SHARED_READ)?;
    b.open(FileFlags::READ | FileFlags::SHARED_READ)?;

    assert_eq!(FileHandle::read_entire_file(&path)?, b"shared contents");

    Ok(())
}

#[cfg(unix)]
#[test]
fn test_exclusive_handle_blocks_others() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let path = write_fixture(&temp_dir, "exclusive.txt", b"mine");

    let mut owner = FileHandle::with_path(&path);
    owner.open(FileFlags::READ | FileFlags::WRITE)?;

    let mut other = FileHandle::with_path(&path);
    let err = other
        .open(FileFlags::READ | FileFlags::SHARED_READ)
        .unwrap_err();
    assert!(matches!(err, FileError::Conflict { .. }), "{err}");
    assert!(!other.is_open());

    assert!(FileHandle::read_entire_file(&path)
        .unwrap_err()
        .is_conflict());

    owner.close();
    other.open(FileFlags::READ | FileFlags::SHARED_READ)?;
    assert!(other.is_open());

    Ok(())
}

#[cfg(unix)]
#[test]
fn test_shared_reader_blocks_exclusive_open() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let path = write_fixture(&temp_dir, "reader.txt", b"read only");

    let mut reader = FileHandle::with_path(&path);
    reader.open(FileFlags::READ | FileFlags::SHARED_READ)?;

    let mut writer = FileHandle::with_path(&path);
    assert!(writer.open(FileFlags::WRITE).unwrap_err().is_conflict());

    Ok(())
}

#[test]
fn test_shared_read_does_not_admit_second_writer() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let path = write_fixture(&temp_dir, "writers.txt", b"0000000000");

    let mut first = FileHandle::with_path(&path);
    first.open(FileFlags::READ | FileFlags::WRITE | FileFlags::SHARED_READ)?;

    let mut second = FileHandle::with_path(&path);
    let err = second
        .open(FileFlags::WRITE | FileFlags::SHARED_READ)
        .unwrap_err();
    assert!(matches!(err, FileError::Conflict { .. }), "{err}");

    let mut reader = FileHandle::with_path(&path);
    assert!(reader
        .open(FileFlags::READ | FileFlags::SHARED_READ)
        .unwrap_err()
        .is_conflict());

    first.write(b"AAAA")?;
    first.close();
    assert_eq!(fs::read(&path)?, b"AAAA000000");

    Ok(())
}

#[test]
fn test_shared_reader_blocks_shared_writer() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let path = write_fixture(&temp_dir, "watched.txt", b"watched");

    let mut reader = FileHandle::with_path(&path);
    reader.open(FileFlags::READ | FileFlags::SHARED_READ)?;

    let mut writer = FileHandle::with_path(&path);
    assert!(writer
        .open(FileFlags::WRITE | FileFlags::SHARED_READ)
        .unwrap_err()
        .is_conflict());
    assert_eq!(fs::read(&path)?, b"watched");

    Ok(())
}

#[cfg(unix)]
#[test]
fn test_create_conflict_does_not_truncate() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let path = write_fixture(&temp_dir, "keep.txt", b"do not truncate");

    let mut owner = FileHandle::with_path(&path);
    owner.open(FileFlags::READ)?;

    let mut writer = FileHandle::with_path(&path);
    assert!(writer.create(FileFlags::WRITE).unwrap_err().is_conflict());
    assert_eq!(fs::read(&path)?, b"do not truncate");

    Ok(())
}

#[cfg(unix)]
#[test]
fn test_delete_conflict_keeps_file() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let path = write_fixture(&temp_dir, "busy.txt", b"busy");

    let mut owner = FileHandle::with_path(&path);
    owner.open(FileFlags::READ | FileFlags::SHARED_READ)?;

    let mut deleter = FileHandle::with_path(&path);
    assert!(matches!(
        deleter.delete(),
        Err(FileError::DeleteConflict { .. })
    ));
    assert!(path.exists());

    owner.close();
    deleter.delete()?;
    assert!(!path.exists());

    Ok(())
}

#[test]
fn test_copy_then_parallel_read_matches() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let src = write_fixture(
        &temp_dir,
        "TestFile.txt",
        banner_text("TestFile.txt", 300).as_bytes(),
    );
    let dst = temp_dir.path().join("TestCopy.txt");
    fs::copy(&src, &dst)?;

    let mut f = FileHandle::with_path(&src);
    let mut g = FileHandle::with_path(&dst);
    f.open(FileFlags::READ | FileFlags::SHARED_READ | FileFlags::SEQUENTIAL_SCAN)?;
    g.open(FileFlags::READ | FileFlags::RANDOM_ACCESS)?;

    let mut buffer = [0u8; 1024];
    let mut dest_buffer = [0u8; 1024];
    loop {
        let read_src = f.read(&mut buffer)?;
        let read_dst = g.read(&mut dest_buffer)?;
        assert_eq!(read_src, read_dst);
        assert_eq!(buffer[..read_src], dest_buffer[..read_dst]);
        if read_src == 0 {
            break;
        }
    }
    f.close();
    g.close();

    assert_eq!(
        compare_files(&src, &dst, 1024)?,
        CompareOutcome::Identical {
            bytes: fs::metadata(&src)?.len()
        }
    );

    g.delete()?;
    assert!(!dst.exists());

    Ok(())
}

#[test]
fn test_write_only_and_read_only_handles_on_different_files() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let input = write_fixture(&temp_dir, "in.bin", &byte_ramp(4096));
    let output = temp_dir.path().join("out.bin");

    let mut reader = FileHandle::with_path(&input);
    let mut writer = FileHandle::with_path(&output);
    reader.open(FileFlags::READ | FileFlags::SEQUENTIAL_SCAN)?;
    writer.create(FileFlags::WRITE)?;

    let mut chunk = [0u8; 1000];
    loop {
        let n = reader.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        writer.write(&chunk[..n])?;
    }
    writer.flush()?;
    writer.close();

    assert_eq!(fs::read(&output)?, byte_ramp(4096));

    Ok(())
}
