//! eyeD3 subprocess wrapper.
//!
//! The external `eyeD3` tool does the actual tag writing. Its contract is
//! narrow: we hand it an argument list, it talks back through stdout and
//! stderr. Classification of the diagnostic stream decides the outcome:
//! empty stderr is success, a recognized "not installed" pattern is a
//! distinct user-actionable failure, anything else is a generic failure.
//! No retries.

use std::io;
use std::path::Path;
use std::process::Command;

use super::marker::ScanMarker;

/// Captured output of one tool invocation.
#[derive(Debug, Clone, Default)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Capability to run the external tagging tool.
///
/// Injected so tests can substitute a recording fake without spawning
/// real processes.
pub trait ToolRunner: Send + Sync {
    fn run(&self, args: &[String]) -> io::Result<ToolOutput>;
}

/// Runs the real `eyeD3` binary.
pub struct SystemRunner;

impl ToolRunner for SystemRunner {
    fn run(&self, args: &[String]) -> io::Result<ToolOutput> {
        let output = Command::new("eyeD3").args(args).output()?;
        Ok(ToolOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Errors from tagging.
#[derive(Debug, thiserror::Error)]
pub enum TagError {
    /// eyeD3 is not installed. Carries installation guidance.
    #[error(
        "It seems you don't have eyeD3 installed.\nUse pip install eyeD3 python-magic-bin: https://eyed3.readthedocs.io/en/latest/installation.html"
    )]
    ToolMissing,

    /// eyeD3 ran but reported a problem on its diagnostic stream.
    #[error("eyeD3 failed: {0}")]
    Tool(String),

    /// The process could not be spawned for a reason other than a missing
    /// binary.
    #[error("failed to launch eyeD3: {0}")]
    Io(#[from] io::Error),
}

/// Tag-writing front end over the eyeD3 tool.
pub struct EyeD3 {
    runner: Box<dyn ToolRunner>,
}

impl EyeD3 {
    pub fn new() -> Self {
        Self::with_runner(Box::new(SystemRunner))
    }

    pub fn with_runner(runner: Box<dyn ToolRunner>) -> Self {
        Self { runner }
    }

    /// The eyeD3 version string.
    pub fn version(&self) -> Result<String, TagError> {
        let stdout = self.run(&["--version".to_string()])?;
        Ok(stdout.trim().to_string())
    }

    /// Strip every metadata frame from the file.
    pub fn remove_all_tags(&self, path: &Path) -> Result<(), TagError> {
        self.run(&["--remove-all".to_string(), path.display().to_string()])?;
        Ok(())
    }

    /// Stamp a file as scanned with a freshly timestamped marker.
    ///
    /// With `remove_all_comments`, every pre-existing comment is cleared in
    /// the same invocation, before the marker is added. Either way a marker
    /// with the same description/language key is overwritten, not appended.
    pub fn mark_as_scanned(
        &self,
        path: &Path,
        remove_all_comments: bool,
    ) -> Result<ScanMarker, TagError> {
        let marker = ScanMarker::now();
        self.write_marker(path, &marker, remove_all_comments)?;
        Ok(marker)
    }

    /// Write a specific marker. [`EyeD3::mark_as_scanned`] is the usual
    /// entry point; this exists for callers that need the timestamp pinned.
    pub fn write_marker(
        &self,
        path: &Path,
        marker: &ScanMarker,
        remove_all_comments: bool,
    ) -> Result<(), TagError> {
        let mut args = Vec::new();
        if remove_all_comments {
            args.push("--remove-all-comments".to_string());
        }
        args.push("--add-comment".to_string());
        args.push(marker.as_tool_arg());
        args.push(path.display().to_string());

        self.run(&args)?;
        Ok(())
    }

    /// Run eyeD3 and classify its diagnostic stream.
    fn run(&self, args: &[String]) -> Result<String, TagError> {
        tracing::debug!(?args, "running eyeD3");

        let output = match self.runner.run(args) {
            Ok(output) => output,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(TagError::ToolMissing),
            Err(e) => return Err(TagError::Io(e)),
        };

        let stderr = output.stderr.trim();
        if stderr.is_empty() {
            return Ok(output.stdout);
        }
        if stderr.contains("command not found") {
            return Err(TagError::ToolMissing);
        }
        Err(TagError::Tool(stderr.to_string()))
    }
}

impl Default for EyeD3 {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Fake runner that records every invocation and answers with a
    /// scripted output.
    struct RecordingRunner {
        invocations: Arc<Mutex<Vec<Vec<String>>>>,
        result: io::Result<ToolOutput>,
    }

    impl RecordingRunner {
        fn ok(stdout: &str, stderr: &str) -> (Arc<Mutex<Vec<Vec<String>>>>, Self) {
            let invocations = Arc::new(Mutex::new(Vec::new()));
            let runner = Self {
                invocations: Arc::clone(&invocations),
                result: Ok(ToolOutput {
                    stdout: stdout.to_string(),
                    stderr: stderr.to_string(),
                }),
            };
            (invocations, runner)
        }

        fn spawn_failure(kind: io::ErrorKind) -> Self {
            Self {
                invocations: Arc::new(Mutex::new(Vec::new())),
                result: Err(io::Error::new(kind, "spawn failed")),
            }
        }
    }

    impl ToolRunner for RecordingRunner {
        fn run(&self, args: &[String]) -> io::Result<ToolOutput> {
            self.invocations.lock().unwrap().push(args.to_vec());
            match &self.result {
                Ok(output) => Ok(output.clone()),
                Err(e) => Err(io::Error::new(e.kind(), e.to_string())),
            }
        }
    }

    #[test]
    fn test_mark_clears_comments_before_adding() {
        let (invocations, runner) = RecordingRunner::ok("", "");
        let eyed3 = EyeD3::with_runner(Box::new(runner));

        let marker = ScanMarker::from_timestamp_ms(1700000000000);
        eyed3
            .write_marker(Path::new("/music/song.mp3"), &marker, true)
            .unwrap();

        let args = &invocations.lock().unwrap()[0];
        assert_eq!(
            args,
            &vec![
                "--remove-all-comments".to_string(),
                "--add-comment".to_string(),
                "MusicManager-1700000000000:MusicManager:eng".to_string(),
                "/music/song.mp3".to_string(),
            ]
        );
    }

    #[test]
    fn test_mark_without_clearing_skips_remove_flag() {
        let (invocations, runner) = RecordingRunner::ok("", "");
        let eyed3 = EyeD3::with_runner(Box::new(runner));

        let marker = ScanMarker::from_timestamp_ms(1700000000000);
        eyed3
            .write_marker(Path::new("/music/song.mp3"), &marker, false)
            .unwrap();

        let args = &invocations.lock().unwrap()[0];
        assert!(!args.contains(&"--remove-all-comments".to_string()));
        assert_eq!(args[0], "--add-comment");
    }

    #[test]
    fn test_empty_stderr_is_success() {
        let (_, runner) = RecordingRunner::ok("eyeD3 0.9.7\n", "");
        let eyed3 = EyeD3::with_runner(Box::new(runner));

        assert_eq!(eyed3.version().unwrap(), "eyeD3 0.9.7");
    }

    #[test]
    fn test_nonempty_stderr_is_generic_failure() {
        let (_, runner) = RecordingRunner::ok("", "error: no tag found");
        let eyed3 = EyeD3::with_runner(Box::new(runner));

        let err = eyed3
            .mark_as_scanned(Path::new("/music/song.mp3"), true)
            .unwrap_err();
        let TagError::Tool(message) = err else {
            panic!("expected generic tool failure, got {err:?}");
        };
        assert!(message.contains("no tag found"));
    }

    #[test]
    fn test_command_not_found_in_stderr_is_tool_missing() {
        let (_, runner) = RecordingRunner::ok("", "sh: eyeD3: command not found");
        let eyed3 = EyeD3::with_runner(Box::new(runner));

        let err = eyed3.version().unwrap_err();
        assert!(matches!(err, TagError::ToolMissing));
        assert!(err.to_string().contains("pip install eyeD3"));
    }

    #[test]
    fn test_spawn_not_found_is_tool_missing() {
        let runner = RecordingRunner::spawn_failure(io::ErrorKind::NotFound);
        let eyed3 = EyeD3::with_runner(Box::new(runner));

        let err = eyed3.version().unwrap_err();
        assert!(matches!(err, TagError::ToolMissing));
    }

    #[test]
    fn test_other_spawn_failure_propagates_as_io() {
        let runner = RecordingRunner::spawn_failure(io::ErrorKind::PermissionDenied);
        let eyed3 = EyeD3::with_runner(Box::new(runner));

        let err = eyed3.version().unwrap_err();
        assert!(matches!(err, TagError::Io(_)));
    }

    #[test]
    fn test_remove_all_tags_args() {
        let (invocations, runner) = RecordingRunner::ok("", "");
        let eyed3 = EyeD3::with_runner(Box::new(runner));

        eyed3.remove_all_tags(Path::new("/music/song.mp3")).unwrap();

        let args = &invocations.lock().unwrap()[0];
        assert_eq!(
            args,
            &vec!["--remove-all".to_string(), "/music/song.mp3".to_string()]
        );
    }
}
