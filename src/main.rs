//! `filehandle` command-line entry point

use anyhow::Result;
use clap::Parser;
use filehandle::cli::{Args, OutputConfig};
use filehandle::commands;
use std::process::ExitCode;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn init_tracing(output: &OutputConfig) {
    // RUST_LOG wins over -v / -q
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(output.log_level()));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run(args: &Args) -> Result<bool> {
    args.validate()?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    commands::run(&args.command, &mut out)
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(&args.output);

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(2)
        }
    }
}
