//! CLI command definitions and dispatch.
//!
//! Each subcommand group is implemented in its own submodule:
//! - `lookup`: fingerprint identification and direct service queries
//! - `mark`: scan-marker stamping

mod lookup;
mod mark;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::runtime::Runtime;

pub use lookup::{cmd_check_tools, cmd_identify, cmd_lookup_recordings, cmd_lookup_track};
pub use mark::cmd_mark;

use crate::config;

/// mp3manager CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Identify a track by its audio fingerprint
    Identify {
        /// Path to the audio file
        path: PathBuf,
        /// AcoustID API key (or set ACOUSTID_API_KEY env var)
        #[arg(short, long, env = "ACOUSTID_API_KEY")]
        api_key: Option<String>,
        /// Stamp the file with a scan marker after a successful lookup
        #[arg(long)]
        mark: bool,
        /// Keep pre-existing comments when marking (overrides config)
        #[arg(long)]
        keep_comments: bool,
        /// Print the full JSON response
        #[arg(long)]
        json: bool,
    },
    /// Look up metadata for an AcoustID track ID
    LookupTrack {
        /// AcoustID track ID (UUID)
        track_id: String,
        /// AcoustID API key (or set ACOUSTID_API_KEY env var)
        #[arg(short, long, env = "ACOUSTID_API_KEY")]
        api_key: Option<String>,
        /// Print the full JSON response
        #[arg(long)]
        json: bool,
    },
    /// List AcoustIDs for one or more MusicBrainz recording IDs
    LookupRecordings {
        /// MusicBrainz recording ID(s)
        #[arg(required = true)]
        recording_ids: Vec<String>,
        /// AcoustID API key (or set ACOUSTID_API_KEY env var)
        #[arg(short, long, env = "ACOUSTID_API_KEY")]
        api_key: Option<String>,
        /// Print the full JSON response
        #[arg(long)]
        json: bool,
    },
    /// Stamp a file with a scan marker without looking it up
    Mark {
        /// Path to the audio file
        path: PathBuf,
        /// Keep pre-existing comments (overrides config)
        #[arg(long)]
        keep_comments: bool,
    },
    /// Check that external tools and credentials are in place
    CheckTools,
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let rt = Runtime::new()?;

    match &cli.command {
        Commands::Identify {
            path,
            api_key,
            mark,
            keep_comments,
            json,
        } => cmd_identify(&rt, path, api_key.as_deref(), *mark, *keep_comments, *json),
        Commands::LookupTrack {
            track_id,
            api_key,
            json,
        } => cmd_lookup_track(&rt, track_id, api_key.as_deref(), *json),
        Commands::LookupRecordings {
            recording_ids,
            api_key,
            json,
        } => cmd_lookup_recordings(&rt, recording_ids, api_key.as_deref(), *json),
        Commands::Mark {
            path,
            keep_comments,
        } => cmd_mark(path, *keep_comments),
        Commands::CheckTools => cmd_check_tools(),
    }
}

// ============================================================================
// Shared helper functions
// ============================================================================

/// Resolve the API key: CLI/env beats the config file.
pub(crate) fn resolve_api_key(cli_key: Option<&str>, config: &config::Config) -> String {
    if let Some(key) = cli_key {
        return key.to_string();
    }
    if let Some(key) = config.credentials.acoustid_api_key.as_deref() {
        return key.to_string();
    }

    eprintln!("Error: AcoustID API key required.");
    eprintln!("Get one at: https://acoustid.org/new-application");
    eprintln!("Then use: --api-key YOUR_KEY, set ACOUSTID_API_KEY,");
    if let Some(path) = config::config_path() {
        eprintln!("or add it under [credentials] in {:?}", path);
    }
    std::process::exit(1);
}

/// Print installation instructions for fpcalc
pub(crate) fn print_fpcalc_install_instructions() {
    eprintln!("Error: fpcalc not found.");
    eprintln!("Install Chromaprint:");
    eprintln!("  Windows: winget install AcoustID.Chromaprint");
    eprintln!("  macOS:   brew install chromaprint");
    eprintln!("  Linux:   apt install libchromaprint-tools");
}
