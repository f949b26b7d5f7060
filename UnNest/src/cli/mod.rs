//! UnNest CLI - secure recursive archive extraction from the command line

pub mod progress;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::bail;
use clap::Parser;

use crate::unpack::{ArchiveStatus, UnpackOptions, Unpacker};

#[derive(Parser)]
#[command(name = "unnest")]
#[command(version = crate::VERSION)]
#[command(about = "Recursively extract archives, safely", long_about = None)]
struct Cli {
    /// Input archives or directories to scan
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output base directory for top-level archives (default: next to each archive)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Keep original archives after successful extraction (default: delete)
    #[arg(long)]
    keep: bool,

    /// Log intended operations without modifying the filesystem
    #[arg(long)]
    dry_run: bool,

    /// Maximum extraction nesting depth
    #[arg(long, default_value_t = 16)]
    max_depth: u32,

    /// Maximum number of archives to extract in one run
    #[arg(long, default_value_t = 10_000)]
    max_archives: usize,

    /// Suppress the progress spinner
    #[arg(short, long)]
    quiet: bool,
}

/// Run the UnNest CLI
pub fn run_cli() -> anyhow::Result<()> {
    // Setup logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Some(output) = &cli.output {
        if !output.exists() && !cli.dry_run {
            std::fs::create_dir_all(output)?;
        }
    }

    let options = UnpackOptions::new()
        .with_output_base(cli.output.clone())
        .with_keep_originals(cli.keep)
        .with_dry_run(cli.dry_run)
        .with_max_depth(cli.max_depth)
        .with_max_archives(cli.max_archives);
    let mut unpacker = Unpacker::new(options);

    let started = Instant::now();
    let spinner = if cli.quiet {
        None
    } else {
        Some(progress::archive_spinner())
    };

    let report = unpacker.run_with_progress(&cli.inputs, &|outcome| {
        if let Some(spinner) = &spinner {
            spinner.inc(1);
            let verb = match &outcome.status {
                ArchiveStatus::Extracted { .. } => "extracted",
                ArchiveStatus::Skipped(_) => "skipped",
                ArchiveStatus::Failed(_) => "failed",
            };
            spinner.set_message(format!("{verb} {}", outcome.archive.display()));
        }
    });

    if let Some(spinner) = &spinner {
        spinner.finish_and_clear();
    }

    progress::print_summary(report.extracted, report.skipped, report.failed);
    progress::print_done(started.elapsed());

    if !report.is_clean() {
        bail!("{} archive(s) failed to extract", report.failed);
    }
    Ok(())
}
