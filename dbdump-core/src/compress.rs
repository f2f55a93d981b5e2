//! Compression stage.

use crate::config::{Compression, sibling_path};
use crate::tools::Toolchain;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::info;

/// Compresses `dump` into a sibling file and returns the sibling's path.
///
/// `zip` archives the dump as `{dump}.zip`; `gzip -c` streams it into
/// `{dump}.gz`. The dump itself is left in place either way.
///
/// # Errors
/// Returns a tool error if the compressor cannot start or fails, or an I/O
/// error if the `.gz` file cannot be created.
pub async fn run_compression(
    dump: &Path,
    compression: Compression,
    tools: &Toolchain,
) -> crate::Result<PathBuf> {
    info!("compressing dump file... ");
    let target = sibling_path(dump, compression.extension());

    match compression {
        Compression::Zip => {
            let args: [OsString; 2] = [target.clone().into(), dump.into()];
            tools.zip.run(&args).await?;
        }
        Compression::Gzip => {
            let args: [OsString; 2] = ["-c".into(), dump.into()];
            tools.gzip.run_to_file(&args, &target).await?;
        }
    }

    Ok(target)
}
