//! Write-then-read equality across sizes and chunkings

mod common;

use common::fixtures::byte_ramp;
use filehandle::{FileFlags, FileHandle};
use rstest::rstest;
use tempfile::TempDir;

#[rstest]
#[case::empty(0)]
#[case::one_byte(1)]
#[case::one_kib(1024)]
#[case::four_mib(4 * 1024 * 1024)]
fn test_round_trip(#[case] size: usize) -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("round_trip.bin");
    let data = byte_ramp(size);

    let mut handle = FileHandle::with_path(&path);
    handle.create(FileFlags::READ | FileFlags::WRITE)?;
    handle.write(&data)?;
    assert_eq!(handle.len(), size as u64);

    handle.set_pos(0)?;
    let mut back = vec![0u8; size];
    handle.read_exact(&mut back)?;
    assert_eq!(back, data);

    let mut extra = [0u8; 16];
    assert_eq!(handle.read(&mut extra)?, 0);

    Ok(())
}

#[rstest]
#[case(1)]
#[case(7)]
#[case(4096)]
fn test_chunked_writes_read_back_whole(#[case] chunk: usize) -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("chunked.bin");
    let data = byte_ramp(10_000);

    let mut writer = FileHandle::with_path(&path);
    writer.create(FileFlags::WRITE | FileFlags::SEQUENTIAL_SCAN)?;
    for piece in data.chunks(chunk) {
        writer.write(piece)?;
    }
    writer.flush()?;
    writer.close();

    assert_eq!(FileHandle::read_entire_file(&path)?, data);

    Ok(())
}

#[test]
fn test_overwrite_in_place() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("patch.txt");

    let mut handle = FileHandle::with_path(&path);
    handle.create(FileFlags::READ | FileFlags::WRITE | FileFlags::RANDOM_ACCESS)?;
    handle.write(b"hello world")?;
    handle.set_pos(6)?;
    handle.write(b"WORLD")?;
    handle.close();

    handle.open(FileFlags::READ)?;
    let mut back = [0u8; 11];
    handle.read_exact(&mut back)?;
    assert_eq!(&back, b"hello WORLD");

    Ok(())
}
