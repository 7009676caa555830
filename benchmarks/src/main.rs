//! Throughput comparison for filehandle
//!
//! Writes and reads one scratch file through:
//! - `FileHandle` (unbuffered, one large write / read)
//! - `BufWriter` / `BufReader` over `std::fs::File`
//! - plain `std::fs::File` and `std::fs::read`
//!
//! and prints a markdown table of timings. Only the public `FileHandle`
//! contract is used.

use anyhow::{Context, Result};
use clap::Parser;
use filehandle::{FileFlags, FileHandle};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Internal buffer size for the buffered std variants
const STD_BUFFER_SIZE: usize = 1024 * 1024;

#[derive(Parser)]
#[command(name = "filehandle-bench")]
#[command(about = "Compare FileHandle throughput against std buffered and unbuffered I/O")]
struct Args {
    /// Scratch file size in MB
    #[arg(long, default_value = "64")]
    size_mb: usize,

    /// Directory for the scratch file (default: a fresh temp directory)
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Also write the markdown report to this path
    #[arg(long)]
    output: Option<PathBuf>,
}

struct Measurement {
    label: &'static str,
    elapsed: Duration,
}

fn measure(label: &'static str, f: impl FnOnce() -> Result<()>) -> Result<Measurement> {
    let start = Instant::now();
    f().with_context(|| format!("{label} failed"))?;
    let elapsed = start.elapsed();
    println!("{label}: {:.3} ms", elapsed.as_secs_f64() * 1000.0);
    Ok(Measurement { label, elapsed })
}

fn run_all(path: &Path, size: usize) -> Result<Vec<Measurement>> {
    let data = vec![0xEEu8; size];
    let mut results = Vec::new();

    results.push(measure("FileHandle write", || {
        let mut f = FileHandle::with_path(path);
        f.create(FileFlags::WRITE)?;
        f.write(&data)?;
        f.close();
        Ok(())
    })?);

    results.push(measure("BufWriter write", || {
        let mut w = BufWriter::with_capacity(STD_BUFFER_SIZE, File::create(path)?);
        w.write_all(&data)?;
        w.flush()?;
        Ok(())
    })?);

    results.push(measure("std::fs::File write", || {
        let mut f = File::create(path)?;
        f.write_all(&data)?;
        Ok(())
    })?);

    let mut buffer = vec![0u8; size];

    results.push(measure("FileHandle read", || {
        let mut f = FileHandle::with_path(path);
        f.open(FileFlags::READ | FileFlags::SEQUENTIAL_SCAN)?;
        f.read_exact(&mut buffer)?;
        f.close();
        Ok(())
    })?);

    results.push(measure("BufReader read", || {
        let mut r = BufReader::with_capacity(STD_BUFFER_SIZE, File::open(path)?);
        r.read_exact(&mut buffer)?;
        Ok(())
    })?);

    results.push(measure("std::fs::read", || {
        let contents = fs::read(path)?;
        anyhow::ensure!(contents.len() == size, "short read: {}", contents.len());
        Ok(())
    })?);

    anyhow::ensure!(buffer.iter().all(|&b| b == 0xEE), "read back wrong bytes");
    Ok(results)
}

fn generate_markdown_report(args: &Args, results: &[Measurement]) -> String {
    let mut report = format!(
        "# filehandle throughput\n\n\
        **Date:** {}\n\
        **Size:** {} MB\n\n\
        | operation | ms | MB/s |\n\
        |---|---:|---:|\n",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S %Z"),
        args.size_mb
    );

    for m in results {
        let secs = m.elapsed.as_secs_f64();
        let throughput = if secs > 0.0 {
            args.size_mb as f64 / secs
        } else {
            f64::INFINITY
        };
        report.push_str(&format!(
            "| {} | {:.3} | {:.1} |\n",
            m.label,
            secs * 1000.0,
            throughput
        ));
    }

    report
}

fn main() -> Result<()> {
    let args = Args::parse();
    anyhow::ensure!(args.size_mb > 0, "--size-mb must be greater than 0");

    let temp_dir = tempfile::TempDir::new().context("Failed to create scratch directory")?;
    let dir = args.dir.clone().unwrap_or_else(|| temp_dir.path().to_path_buf());
    let path = dir.join("filehandle-bench.bin");

    let results = run_all(&path, args.size_mb * 1024 * 1024)?;

    let mut scratch = FileHandle::with_path(&path);
    scratch
        .delete()
        .with_context(|| format!("Failed to remove {}", path.display()))?;

    let report = generate_markdown_report(&args, &results);
    println!("\n{report}");

    if let Some(output) = &args.output {
        fs::write(output, report)
            .with_context(|| format!("Failed to write report to {:?}", output))?;
    }

    Ok(())
}
