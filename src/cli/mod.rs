//! Command-line interface for mp3manager.
//!
//! This module provides CLI commands for identifying audio files,
//! querying the lookup service directly, and stamping files as scanned.

mod commands;

pub use commands::{Cli, Commands, run_command};
