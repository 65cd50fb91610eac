//! mp3manager - identifies audio files by acoustic content and stamps them
//! as scanned.
//!
//! The pipeline: fingerprint a file with Chromaprint's fpcalc, resolve the
//! fingerprint against the AcoustID web service, then embed a scan-marker
//! comment with eyeD3 so the file is not reprocessed.

pub mod acoustid;
pub mod cli;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod scanner;
pub mod tagger;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(EnvFilter::from_default_env().add_directive("mp3manager=info".parse().unwrap()))
        .init();

    cli::run_command(&args)
}
