//! MySQL dump tool.
//!
//! Runs `mysqldump` with settings taken from flags or a `.env` file and
//! optionally compresses the result with `zip` or `gzip`.
//!
//! # Security Guarantees
//! - No shell is involved in running external programs
//! - Passwords never appear in log output
//!
//! # Exit Codes
//! - 0: dump (and compression, if requested) succeeded
//! - 1: configuration, dump or compression failed
//! - 2: invalid command-line arguments

use anyhow::Context;
use dbdump::Cli;
use dbdump_core::{RunTimestamp, init_logging, pipeline};
use std::process::ExitCode;
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    let timestamp = RunTimestamp::now();
    let cli = Cli::parse_args();

    if let Err(e) = init_logging(cli.verbose, cli.quiet) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    let config = match cli.resolve(timestamp).context("Invalid configuration") {
        Ok(config) => config,
        Err(e) => {
            error!("{:#}", e);
            return ExitCode::FAILURE;
        }
    };

    // Stage failures are logged by the pipeline itself.
    match pipeline::run(&config, &cli.toolchain()).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
