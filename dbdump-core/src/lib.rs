//! Core library for dbdump.
//!
//! dbdump dumps a MySQL-compatible database through `mysqldump` and can
//! compress the result with `zip` or `gzip`. This crate holds everything
//! except argument parsing: the run configuration, env file loading, the
//! external tool runner and the stages built on it.
//!
//! # Security Guarantees
//! - External programs are spawned directly, never through a shell
//! - Passwords are held in zeroizing buffers (credentials and the dump
//!   argument vector) and masked in every log line
//! - Error messages never include credentials
//!
//! # Example
//! ```rust,no_run
//! use dbdump_core::{DatabaseTarget, RunConfiguration, RunTimestamp, Toolchain};
//!
//! # async fn demo() -> dbdump_core::Result<()> {
//! let config = RunConfiguration::new(RunTimestamp::now()).with_target(DatabaseTarget {
//!     database: "shop".to_string(),
//!     ..DatabaseTarget::default()
//! });
//! config.validate()?;
//! let report = dbdump_core::pipeline::run(&config, &Toolchain::default()).await?;
//! println!("{}", report.dump.display());
//! # Ok(())
//! # }
//! ```

pub mod compress;
pub mod config;
pub mod dump;
pub mod env_file;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod security;
pub mod timestamp;
pub mod tools;

// Re-export commonly used types
pub use config::{
    Compression, DatabaseTarget, FileType, OutputSpec, RunConfiguration, TableSelection,
    TableSplit,
};
pub use env_file::EnvFile;
pub use error::{DbDumpError, Result};
pub use logging::init_logging;
pub use pipeline::RunReport;
pub use security::Credentials;
pub use timestamp::RunTimestamp;
pub use tools::{ExternalTool, Toolchain};
