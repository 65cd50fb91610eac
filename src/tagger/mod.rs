//! Scan-marker tagging via the external eyeD3 tool.
//!
//! Records that a file has been through identification by embedding a
//! uniquely-keyed comment in its tag storage. The subprocess boundary is
//! an injected [`ToolRunner`] capability, so everything above it can be
//! exercised without eyeD3 present.

pub mod eyed3;
pub mod marker;

pub use eyed3::{EyeD3, SystemRunner, TagError, ToolOutput, ToolRunner};
pub use marker::{LANG, ScanMarker, TAG};
