//! Application-wide error types.
//!
//! Library modules carry specific error types via `thiserror`, while
//! CLI/main uses `anyhow` for convenient error propagation. This module
//! aggregates the module errors for callers that want a single type.
//!
//! Note the split the lookup client enforces: a non-2xx answer from the
//! lookup service is NOT an [`Error`] - it resolves as a value (see
//! [`crate::acoustid::LookupOutcome`]). Only validation failures,
//! unreachable hosts, and contract violations land here.

use crate::acoustid::LookupError;
use crate::config::ConfigError;
use crate::fingerprint::FingerprintError;
use crate::tagger::TagError;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Fingerprint generation error
    #[error("Fingerprint error: {0}")]
    Fingerprint(#[from] FingerprintError),

    /// Lookup client error
    #[error("Lookup error: {0}")]
    Lookup(#[from] LookupError),

    /// Tag writing error
    #[error("Tagging error: {0}")]
    Tag(#[from] TagError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Io(e).context(ctx))
    }
}
