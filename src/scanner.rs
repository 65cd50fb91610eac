//! Scan pipeline - orchestrates identification and marking.
//!
//! This is the high-level API tying the pieces together:
//! 1. Generate an audio fingerprint (via fpcalc)
//! 2. Resolve it against the AcoustID lookup service
//! 3. On a successful resolution, stamp the file with a scan marker so it
//!    is not reprocessed
//!
//! A normalized service error still counts as a completed lookup - it is
//! reported in the [`ScanReport`] - but the file is only stamped when the
//! service actually answered with metadata.

use std::path::Path;

use crate::acoustid::{AcoustIdClient, LookupOutcome};
use crate::error::Result;
use crate::fingerprint::{self, AudioFingerprint};
use crate::tagger::{EyeD3, ScanMarker};

/// What one trip through the pipeline produced.
#[derive(Debug)]
pub struct ScanReport {
    /// The lookup resolution, success or normalized service error.
    pub outcome: LookupOutcome,
    /// The marker stamped onto the file, when one was written.
    pub marker: Option<ScanMarker>,
}

/// Identification-and-marking pipeline.
pub struct Scanner {
    client: AcoustIdClient,
    eyed3: EyeD3,
    remove_all_comments: bool,
}

impl Scanner {
    /// Build a pipeline over the production client and tagger.
    pub fn new(api_key: impl Into<String>, remove_all_comments: bool) -> Result<Self> {
        Ok(Self::with_parts(
            AcoustIdClient::new(api_key)?,
            EyeD3::new(),
            remove_all_comments,
        ))
    }

    /// Assemble a pipeline from explicit parts. Tests use this to inject
    /// fakes at both external boundaries.
    pub fn with_parts(client: AcoustIdClient, eyed3: EyeD3, remove_all_comments: bool) -> Self {
        Self {
            client,
            eyed3,
            remove_all_comments,
        }
    }

    /// Identify a file without touching it: fingerprint, then look up.
    pub async fn identify(&self, path: &Path) -> Result<LookupOutcome> {
        let fp = fingerprint::generate(path)?;
        tracing::debug!(duration_secs = fp.duration_secs, "fingerprint generated");
        let outcome = self
            .client
            .lookup_by_fingerprint(fp.fingerprint, fp.duration_secs)
            .await?;
        Ok(outcome)
    }

    /// Full pipeline: fingerprint, look up, and stamp on success.
    pub async fn process(&self, path: &Path) -> Result<ScanReport> {
        let fp = fingerprint::generate(path)?;
        self.resolve_and_mark(path, &fp).await
    }

    /// Look up an already-computed fingerprint and stamp the file when the
    /// service resolves it.
    pub async fn resolve_and_mark(
        &self,
        path: &Path,
        fp: &AudioFingerprint,
    ) -> Result<ScanReport> {
        let outcome = self
            .client
            .lookup_by_fingerprint(fp.fingerprint.clone(), fp.duration_secs)
            .await?;

        let marker = match &outcome {
            LookupOutcome::Success(_) => {
                let marker = self
                    .eyed3
                    .mark_as_scanned(path, self.remove_all_comments)?;
                tracing::info!(?path, comment = %marker.comment(), "marked as scanned");
                Some(marker)
            }
            LookupOutcome::ServiceError(err) => {
                tracing::warn!(?path, status = %err.http_status, "lookup failed, not marking");
                None
            }
        };

        Ok(ScanReport { outcome, marker })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;

    use crate::acoustid::{LookupTransport, TransportError};
    use crate::tagger::{ToolOutput, ToolRunner};

    struct StaticTransport {
        response: Scripted,
    }

    enum Scripted {
        Body(&'static str),
        Status(&'static str),
    }

    #[async_trait]
    impl LookupTransport for StaticTransport {
        async fn get(&self, _url: &str) -> std::result::Result<String, TransportError> {
            match self.response {
                Scripted::Body(body) => Ok(body.to_string()),
                Scripted::Status(combined) => Err(TransportError::Status(combined.to_string())),
            }
        }
    }

    struct CountingRunner {
        runs: Arc<AtomicUsize>,
    }

    impl ToolRunner for CountingRunner {
        fn run(&self, _args: &[String]) -> io::Result<ToolOutput> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            Ok(ToolOutput::default())
        }
    }

    fn scanner_with(response: Scripted) -> (Scanner, Arc<AtomicUsize>) {
        let runs = Arc::new(AtomicUsize::new(0));
        let client = AcoustIdClient::with_transport(
            "test-key",
            Box::new(StaticTransport { response }),
        )
        .unwrap();
        let eyed3 = EyeD3::with_runner(Box::new(CountingRunner {
            runs: Arc::clone(&runs),
        }));
        (Scanner::with_parts(client, eyed3, true), runs)
    }

    fn test_fp() -> AudioFingerprint {
        AudioFingerprint {
            fingerprint: "AQADtNIyRUkkZUqS".to_string(),
            duration_secs: 180,
        }
    }

    #[tokio::test]
    async fn test_successful_resolution_marks_the_file() {
        let (scanner, runs) = scanner_with(Scripted::Body(r#"{"status":"ok","results":[]}"#));

        let report = scanner
            .resolve_and_mark(Path::new("/music/song.mp3"), &test_fp())
            .await
            .unwrap();

        assert!(report.outcome.is_success());
        assert!(report.marker.is_some());
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_service_error_leaves_file_untouched() {
        let (scanner, runs) = scanner_with(Scripted::Status(
            r#"400 Bad Request - {"error":{"message":"invalid API key"}}"#,
        ));

        let report = scanner
            .resolve_and_mark(Path::new("/music/song.mp3"), &test_fp())
            .await
            .unwrap();

        assert!(!report.outcome.is_success());
        assert!(report.marker.is_none());
        assert_eq!(runs.load(Ordering::SeqCst), 0, "must not mark on failure");
    }

    #[tokio::test]
    async fn test_protocol_violation_propagates_as_error() {
        let (scanner, runs) = scanner_with(Scripted::Status("garbage with no delimiter"));

        let result = scanner
            .resolve_and_mark(Path::new("/music/song.mp3"), &test_fp())
            .await;

        assert!(result.is_err());
        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }
}
