//! The dump → compress sequence.

use crate::compress::run_compression;
use crate::config::RunConfiguration;
use crate::dump::run_dump;
use crate::tools::Toolchain;
use std::path::PathBuf;
use tracing::{error, info};

/// Files produced by a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// The raw dump
    pub dump: PathBuf,
    /// The compressed sibling, when compression ran
    pub compressed: Option<PathBuf>,
}

/// Runs every stage in order, stopping at the first failure.
///
/// Each failure is logged here with the stage it happened in, then
/// returned so the caller can choose an exit code.
///
/// # Errors
/// Returns the first dump or compression error.
pub async fn run(config: &RunConfiguration, tools: &Toolchain) -> crate::Result<RunReport> {
    info!("dumping database...");
    let dump = run_dump(config, &tools.dump).await.map_err(|e| {
        error!("Error occurred! {}", e);
        e
    })?;

    let compressed = match config.output.file_type.compression() {
        Some(compression) => Some(
            run_compression(&dump, compression, tools)
                .await
                .map_err(|e| {
                    error!("Cannot compress file. {}", e);
                    e
                })?,
        ),
        None => None,
    };

    info!("done!");
    Ok(RunReport { dump, compressed })
}
