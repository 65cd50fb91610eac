//! Fingerprint identification and direct lookup commands.

use std::path::PathBuf;
use tokio::runtime::Runtime;

use crate::acoustid::{AcoustIdClient, LookupOutcome, RemoteServiceError};
use crate::scanner::Scanner;
use crate::{config, fingerprint, tagger};

use super::{print_fpcalc_install_instructions, resolve_api_key};

/// Identify a track using audio fingerprinting
pub fn cmd_identify(
    rt: &Runtime,
    path: &PathBuf,
    api_key: Option<&str>,
    mark: bool,
    keep_comments: bool,
    json: bool,
) -> anyhow::Result<()> {
    let config = config::load();
    let api_key = resolve_api_key(api_key, &config);

    if !fingerprint::is_fpcalc_available() {
        print_fpcalc_install_instructions();
        std::process::exit(1);
    }

    println!("Identifying: {:?}", path);

    let remove_all = config.scanner.remove_all_comments && !keep_comments;
    let scanner = Scanner::new(api_key, remove_all)?;

    let (outcome, marker) = if mark {
        let report = rt.block_on(scanner.process(path))?;
        (report.outcome, report.marker)
    } else {
        (rt.block_on(scanner.identify(path))?, None)
    };

    let body = match outcome {
        LookupOutcome::Success(body) => body,
        LookupOutcome::ServiceError(err) => {
            print_service_error(&err);
            std::process::exit(1);
        }
    };

    print_success(&body, json)?;

    if let Some(marker) = marker {
        println!("✓ Marked as scanned ({})", marker.comment());
    }

    Ok(())
}

/// Look up data connected to an AcoustID track ID
pub fn cmd_lookup_track(
    rt: &Runtime,
    track_id: &str,
    api_key: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let config = config::load();
    let api_key = resolve_api_key(api_key, &config);

    let client = AcoustIdClient::new(api_key)?;
    let outcome = rt.block_on(client.lookup_by_track_id(track_id))?;

    finish_lookup(outcome, json)
}

/// List AcoustIDs by MusicBrainz recording ID(s)
pub fn cmd_lookup_recordings(
    rt: &Runtime,
    recording_ids: &[String],
    api_key: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let config = config::load();
    let api_key = resolve_api_key(api_key, &config);

    let client = AcoustIdClient::new(api_key)?;
    let outcome = rt.block_on(client.list_ids_by_recording_id(recording_ids.iter().cloned()))?;

    finish_lookup(outcome, json)
}

/// Check if external tools and credentials are in place
pub fn cmd_check_tools() -> anyhow::Result<()> {
    println!("Checking tools...\n");

    // Check fpcalc
    if let Some(version) = fingerprint::fpcalc_version() {
        println!("✓ fpcalc: {}", version);
    } else {
        println!("✗ fpcalc: NOT FOUND");
        print_fpcalc_install_instructions();
    }

    // Check eyeD3
    match tagger::EyeD3::new().version() {
        Ok(version) => println!("✓ eyeD3: {}", version),
        Err(e) => {
            println!("✗ eyeD3: NOT FOUND");
            eprintln!("{}", e);
        }
    }

    println!();
    println!("API Keys:");
    if std::env::var("ACOUSTID_API_KEY").is_ok() {
        println!("✓ ACOUSTID_API_KEY: set");
    } else if config::load().credentials.acoustid_api_key.is_some() {
        println!("✓ acoustid_api_key: set in config file");
    } else {
        println!("✗ ACOUSTID_API_KEY: not set");
        println!("  Get one at: https://acoustid.org/new-application");
    }

    Ok(())
}

// ============================================================================
// Output helpers
// ============================================================================

fn finish_lookup(outcome: LookupOutcome, json: bool) -> anyhow::Result<()> {
    match outcome {
        LookupOutcome::Success(body) => print_success(&body, json),
        LookupOutcome::ServiceError(err) => {
            print_service_error(&err);
            std::process::exit(1);
        }
    }
}

/// Summarize a successful lookup body, or dump it whole with `--json`.
fn print_success(body: &serde_json::Value, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(body)?);
        return Ok(());
    }

    match body.get("results").and_then(|r| r.as_array()) {
        Some(results) if !results.is_empty() => {
            println!("✓ {} match(es)", results.len());
            for result in results {
                let id = result.get("id").and_then(|v| v.as_str()).unwrap_or("?");
                match result.get("score").and_then(|v| v.as_f64()) {
                    Some(score) => println!("  {} (score {:.0}%)", id, score * 100.0),
                    None => println!("  {}", id),
                }
                if let Some(title) = result
                    .pointer("/recordings/0/title")
                    .and_then(|v| v.as_str())
                {
                    println!("    {}", title);
                }
            }
            println!("\nRun with --json for the full response.");
        }
        _ => println!("✗ No matches found."),
    }
    Ok(())
}

fn print_service_error(err: &RemoteServiceError) {
    eprintln!("✗ Lookup failed ({})", err.http_status);
    if let Some(message) = err.message() {
        eprintln!("  {}", message);
    } else if !err.details.is_empty() {
        eprintln!("  {}", serde_json::Value::Object(err.details.clone()));
    }
}
