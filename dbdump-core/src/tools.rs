//! External program invocation.
//!
//! Programs are spawned directly with an argument vector; no shell ever
//! sees the command line, so credentials and table names are passed
//! through byte-for-byte.

use crate::error::DbDumpError;
use crate::security::redact_args;
use std::ffi::{OsStr, OsString};
use std::path::Path;
use std::process::{Output, Stdio};
use tokio::process::Command;
use tracing::debug;

/// Default dump program.
pub const MYSQLDUMP: &str = "mysqldump";
/// Default zip program.
pub const ZIP: &str = "zip";
/// Default gzip program.
pub const GZIP: &str = "gzip";

/// A program plus arguments that precede the ones each stage adds.
///
/// # Example
/// ```rust
/// use dbdump_core::tools::ExternalTool;
///
/// let tool = ExternalTool::new("mysqldump");
/// assert_eq!(tool.name(), "mysqldump");
///
/// // Stand-in used by tests: `sh -c '<script>' mysqldump <args...>`
/// let fake = ExternalTool::new("sh").with_args(["-c", "echo \"$@\"", "mysqldump"]);
/// assert_eq!(fake.name(), "sh");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalTool {
    program: OsString,
    leading_args: Vec<OsString>,
}

impl ExternalTool {
    /// Creates a tool with no leading arguments.
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
        }
    }

    /// Builder method to prepend fixed arguments.
    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.leading_args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Display name used in logs and errors.
    pub fn name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }

    // `args` is only borrowed; nothing here copies a password.
    fn command<S: AsRef<OsStr>>(&self, args: &[S]) -> (Command, String) {
        let line = redact_args(
            &self.name(),
            self.leading_args
                .iter()
                .map(OsString::as_os_str)
                .chain(args.iter().map(S::as_ref)),
        );
        let mut command = Command::new(&self.program);
        command
            .args(&self.leading_args)
            .args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true);
        (command, line)
    }

    /// Runs the tool to completion, discarding its stdout.
    ///
    /// # Errors
    /// Returns [`DbDumpError::ToolLaunch`] if the program cannot be spawned
    /// and [`DbDumpError::ToolFailed`] if it exits unsuccessfully.
    pub async fn run<S: AsRef<OsStr>>(&self, args: &[S]) -> crate::Result<()> {
        let (mut command, line) = self.command(args);
        debug!("Running: {}", line);
        command.stdout(Stdio::null()).stderr(Stdio::piped());
        self.finish(command).await
    }

    /// Runs the tool to completion with its stdout written to `destination`.
    ///
    /// The destination is created (or truncated) before the tool starts.
    ///
    /// # Errors
    /// Returns [`DbDumpError::Io`] if the destination cannot be created, and
    /// the same errors as [`ExternalTool::run`] otherwise.
    pub async fn run_to_file<S: AsRef<OsStr>>(
        &self,
        args: &[S],
        destination: &Path,
    ) -> crate::Result<()> {
        let file = tokio::fs::File::create(destination).await.map_err(|e| {
            DbDumpError::io(format!("Failed to create {}", destination.display()), e)
        })?;
        let file = file.into_std().await;

        let (mut command, line) = self.command(args);
        debug!("Running: {} > {}", line, destination.display());
        command.stdout(Stdio::from(file)).stderr(Stdio::piped());
        self.finish(command).await
    }

    // `Command::output` would re-pipe stdout, so spawn and wait instead.
    async fn finish(&self, mut command: Command) -> crate::Result<()> {
        let child = command
            .spawn()
            .map_err(|e| DbDumpError::tool_launch(self.name(), e))?;
        let output = child
            .wait_with_output()
            .await
            .map_err(|e| DbDumpError::tool_launch(self.name(), e))?;
        self.check(&output)
    }

    fn check(&self, output: &Output) -> crate::Result<()> {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stderr = stderr.trim();
        if !stderr.is_empty() {
            debug!("{} stderr: {}", self.name(), stderr);
        }
        if output.status.success() {
            Ok(())
        } else {
            Err(DbDumpError::tool_failed(self.name(), output.status))
        }
    }
}

/// The three external programs a run may use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    /// Database dump program
    pub dump: ExternalTool,
    /// Zip archiver
    pub zip: ExternalTool,
    /// Gzip compressor
    pub gzip: ExternalTool,
}

impl Default for Toolchain {
    fn default() -> Self {
        Self {
            dump: ExternalTool::new(MYSQLDUMP),
            zip: ExternalTool::new(ZIP),
            gzip: ExternalTool::new(GZIP),
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn script(body: &str) -> ExternalTool {
        ExternalTool::new("sh").with_args(["-c", body, "fake"])
    }

    #[tokio::test]
    async fn test_run_to_file_captures_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");

        script("printf '%s\\n' \"$@\"")
            .run_to_file(&["one", "two words", "$HOME;rm"], &out)
            .await
            .unwrap();

        let written = std::fs::read_to_string(&out).unwrap();
        assert_eq!(written, "one\ntwo words\n$HOME;rm\n");
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_tool_failed() {
        let result = script("echo boom >&2; exit 3").run(&["x"]).await;
        match result {
            Err(DbDumpError::ToolFailed { tool, status }) => {
                assert_eq!(tool, "sh");
                assert_eq!(status, "exit code 3");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_program_is_launch_error() {
        let tool = ExternalTool::new("dbdump-definitely-not-installed");
        let result = tool.run::<&str>(&[]).await;
        assert!(matches!(result, Err(DbDumpError::ToolLaunch { .. })));
    }

    #[tokio::test]
    async fn test_unwritable_destination_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("missing-dir").join("out");
        let result = script("true").run_to_file(&["x"], &out).await;
        assert!(matches!(result, Err(DbDumpError::Io { .. })));
    }

    #[test]
    fn test_command_line_masks_borrowed_password() {
        let secret = zeroize::Zeroizing::new(vec![
            "--user=root".to_string(),
            "--password=-xY9secret".to_string(),
        ]);
        let (_, line) = ExternalTool::new("mysqldump").command(secret.as_slice());
        assert_eq!(line, "mysqldump --user=root --password=****");
    }

    #[test]
    fn test_default_toolchain() {
        let tools = Toolchain::default();
        assert_eq!(tools.dump.name(), "mysqldump");
        assert_eq!(tools.zip.name(), "zip");
        assert_eq!(tools.gzip.name(), "gzip");
    }
}
