//! Scan-marker computation.
//!
//! A marker is an ID3 comment of the form `comment:description:language`.
//! `description` and `language` are fixed, and together they form the
//! comment's uniqueness key: writing a marker onto a file that already has
//! one replaces it rather than appending. Only the timestamp embedded in
//! the comment text differs between writes.

use chrono::Utc;

/// Comment description used to mark a file as scanned.
pub const TAG: &str = "MusicManager";

/// ISO 639-2 language code for the marker comment.
pub const LANG: &str = "eng";

/// An embedded tag comment recording that a file has been processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanMarker {
    timestamp_ms: i64,
}

impl ScanMarker {
    /// Marker stamped with the current wall-clock time.
    pub fn now() -> Self {
        Self {
            timestamp_ms: Utc::now().timestamp_millis(),
        }
    }

    /// Marker with an explicit creation time (unix milliseconds).
    pub fn from_timestamp_ms(timestamp_ms: i64) -> Self {
        Self { timestamp_ms }
    }

    /// The comment text. This is the only part ordinary metadata readers
    /// surface.
    pub fn comment(&self) -> String {
        format!("{TAG}-{}", self.timestamp_ms)
    }

    /// The full `comment:description:language` argument handed to the
    /// tagging tool.
    pub fn as_tool_arg(&self) -> String {
        format!("{}:{TAG}:{LANG}", self.comment())
    }
}
