//! Error types with credential sanitization.
//!
//! No variant carries the database password. Command lines that end up in
//! error context or logs go through [`crate::security::redact_args`] first.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for dbdump operations.
///
/// # Security
/// Error messages never include the database password. Values read from the
/// env file are referred to by key, never echoed.
#[derive(Debug, Error)]
pub enum DbDumpError {
    /// Configuration or validation error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// The env file could not be opened or read
    #[error("Failed to read config file {}: {source}", path.display())]
    EnvFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O operation failed
    #[error("I/O operation failed: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// An external program could not be started
    #[error("Failed to launch {tool}: {source}")]
    ToolLaunch {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// An external program ran but did not succeed
    #[error("{tool} exited unsuccessfully ({status})")]
    ToolFailed { tool: String, status: String },
}

/// Convenience type alias for Results with DbDumpError
pub type Result<T> = std::result::Result<T, DbDumpError>;

impl DbDumpError {
    /// Creates a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates an I/O error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Creates a launch error for the named tool
    pub fn tool_launch(tool: impl Into<String>, source: std::io::Error) -> Self {
        Self::ToolLaunch {
            tool: tool.into(),
            source,
        }
    }

    /// Creates a failure error from a finished process status.
    pub fn tool_failed(tool: impl Into<String>, status: std::process::ExitStatus) -> Self {
        let status = status
            .code()
            .map_or_else(|| "terminated by signal".to_string(), |code| format!("exit code {code}"));
        Self::ToolFailed {
            tool: tool.into(),
            status,
        }
    }
}
