//! Scan-marker stamping command.

use std::path::PathBuf;

use crate::{config, tagger};

/// Stamp a file with a scan marker without looking it up
pub fn cmd_mark(path: &PathBuf, keep_comments: bool) -> anyhow::Result<()> {
    let config = config::load();
    let remove_all = config.scanner.remove_all_comments && !keep_comments;

    let marker = tagger::EyeD3::new().mark_as_scanned(path, remove_all)?;

    println!("✓ Marked as scanned: {:?}", path);
    println!("  comment: {}", marker.comment());
    if remove_all {
        println!("  pre-existing comments removed");
    }
    Ok(())
}
