//! Dump stage: runs the dump tool with its stdout redirected to the dump file.

use crate::config::{DatabaseTarget, RunConfiguration};
use crate::tools::ExternalTool;
use std::path::PathBuf;
use tracing::{debug, info};
use zeroize::Zeroizing;

/// Builds the dump tool arguments for `target`.
///
/// Empty host, user and password are left out so the tool applies its own
/// defaults instead of prompting. Tables follow the database name, one per
/// argument.
///
/// # Example
/// ```rust
/// use dbdump_core::config::{DatabaseTarget, TableSelection, TableSplit};
/// use dbdump_core::dump::dump_args;
/// use dbdump_core::security::Credentials;
///
/// let target = DatabaseTarget {
///     host: "db".to_string(),
///     database: "shop".to_string(),
///     credentials: Credentials::new("root", "pw"),
///     tables: TableSelection::parse("users,orders", TableSplit::All),
///     ..DatabaseTarget::default()
/// };
/// assert_eq!(
///     dump_args(&target).as_slice(),
///     ["--host=db", "--port=3306", "--user=root", "--password=pw", "shop", "users", "orders"]
/// );
/// ```
pub fn dump_args(target: &DatabaseTarget) -> Zeroizing<Vec<String>> {
    let mut args = Vec::with_capacity(5usize.saturating_add(target.tables.names().len()));
    if !target.host.is_empty() {
        args.push(format!("--host={}", target.host));
    }
    args.push(format!("--port={}", target.port));
    if !target.credentials.username().is_empty() {
        args.push(format!("--user={}", target.credentials.username()));
    }
    if target.credentials.has_password() {
        args.push(format!("--password={}", target.credentials.password()));
    }
    args.push(target.database.clone());
    args.extend(target.tables.names().iter().cloned());
    Zeroizing::new(args)
}

/// Dumps the configured database into [`RunConfiguration::dump_path`].
///
/// Returns the path written. A failed run may leave a partial file behind.
///
/// # Errors
/// Returns an I/O error if the output file cannot be created, or a tool
/// error if the dump program cannot start or exits unsuccessfully.
pub async fn run_dump(config: &RunConfiguration, tool: &ExternalTool) -> crate::Result<PathBuf> {
    let path = config.dump_path();
    debug!("Target: {}", config.target);
    if !config.target.tables.names().is_empty() {
        debug!("Tables: {}", config.target.tables.argument());
    }

    let args = dump_args(&config.target);
    tool.run_to_file(args.as_slice(), &path).await?;

    info!("dump written to {}", path.display());
    Ok(path)
}
