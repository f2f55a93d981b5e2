//! Command-line surface for dbdump.
//!
//! Exposed as a library so argument handling can be tested without
//! spawning the binary.

use clap::Parser;
use dbdump_core::{
    Credentials, DatabaseTarget, EnvFile, ExternalTool, FileType, OutputSpec, RunConfiguration,
    RunTimestamp, TableSelection, TableSplit, Toolchain,
    config::{ALL_TABLES, DEFAULT_NAME, DEFAULT_PORT},
};
use std::ffi::OsString;
use std::path::PathBuf;
use tracing::warn;

/// Long options historically spelled with a single dash (`-db_user`).
pub const LEGACY_LONG_FLAGS: [&str; 6] =
    ["db_user", "db_pass", "db_host", "db_name", "db_port", "config"];

/// CLI argument structure
#[derive(Parser, Debug)]
#[command(name = "dbdump")]
#[command(about = "Dump a MySQL-compatible database to a file")]
#[command(version)]
#[command(long_about = "
dbdump - mysqldump wrapper with optional compression

Runs mysqldump against the given database and writes the dump to
{path}{name}[timestamp]. With -f zip or -f gz the dump is also compressed
into a .zip or .gz file next to it.

Connection settings can come from flags or from a Laravel-style .env file
(-config). Values in the file win over flags.

SECURITY FEATURES:
- No shell is involved; credentials are passed as literal arguments
- Passwords are masked in all log output

EXAMPLES:
  dbdump -db_host localhost -db_user root -db_pass secret -db_name shop
  dbdump -config /var/www/app/.env -f gz -d -p /var/backups/
  dbdump -config .env -t users,orders -n users-and-orders -f zip
")]
pub struct Cli {
    /// Tables to dump, comma separated ("*" for all)
    #[arg(short = 't', long = "tables", default_value = ALL_TABLES, allow_hyphen_values = true)]
    pub tables: String,

    /// Output file name
    #[arg(short = 'n', long = "name", default_value = DEFAULT_NAME, allow_hyphen_values = true)]
    pub name: String,

    /// Output directory (with trailing /) or file name prefix
    #[arg(short = 'p', long = "path", allow_hyphen_values = true)]
    pub path: Option<PathBuf>,

    /// Output file type (sql|zip|gz)
    #[arg(short = 'f', long = "file-type", default_value = "sql", allow_hyphen_values = true)]
    pub file_type: String,

    /// Add the run timestamp to output file names
    #[arg(short = 'd', long = "date")]
    pub include_date: bool,

    /// Database user name
    #[arg(long = "db_user", default_value = "", allow_hyphen_values = true)]
    pub db_user: String,

    /// Database user password
    #[arg(
        long = "db_pass",
        env = "DB_PASSWORD",
        hide_env_values = true,
        default_value = "",
        allow_hyphen_values = true
    )]
    pub db_pass: String,

    /// Database host
    #[arg(long = "db_host", default_value = "", allow_hyphen_values = true)]
    pub db_host: String,

    /// Database name
    #[arg(long = "db_name", default_value = "", allow_hyphen_values = true)]
    pub db_name: String,

    /// Database port number
    #[arg(long = "db_port", default_value_t = DEFAULT_PORT)]
    pub db_port: u16,

    /// Database config file (KEY=VALUE lines, e.g. a Laravel .env)
    #[arg(long = "config", value_name = "FILE", allow_hyphen_values = true)]
    pub config: Option<PathBuf>,

    /// Replace only the first three commas of the table list
    #[arg(long)]
    pub legacy_table_split: bool,

    /// Dump program
    #[arg(long, value_name = "PROGRAM", default_value = dbdump_core::tools::MYSQLDUMP)]
    pub dump_bin: PathBuf,

    /// Zip program
    #[arg(long, value_name = "PROGRAM", default_value = dbdump_core::tools::ZIP)]
    pub zip_bin: PathBuf,

    /// Gzip program
    #[arg(long, value_name = "PROGRAM", default_value = dbdump_core::tools::GZIP)]
    pub gzip_bin: PathBuf,

    /// Increase verbosity
    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv)"
    )]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, help = "Suppress all output except errors")]
    pub quiet: bool,
}

impl Cli {
    /// Parses process arguments, accepting the single-dash long spellings.
    pub fn parse_args() -> Self {
        Self::parse_from(normalize_legacy_args(std::env::args_os()))
    }

    /// Table split mode selected by the flags.
    pub const fn table_split(&self) -> TableSplit {
        if self.legacy_table_split {
            TableSplit::Legacy
        } else {
            TableSplit::All
        }
    }

    /// Programs to invoke.
    pub fn toolchain(&self) -> Toolchain {
        Toolchain {
            dump: ExternalTool::new(&self.dump_bin),
            zip: ExternalTool::new(&self.zip_bin),
            gzip: ExternalTool::new(&self.gzip_bin),
        }
    }

    /// Builds the run configuration from flags alone.
    ///
    /// Logs a warning for an unrecognized file type and keeps it.
    pub fn flag_configuration(&self, timestamp: RunTimestamp) -> RunConfiguration {
        let file_type = FileType::from_flag(&self.file_type);
        if !file_type.is_recognized() {
            warn!(
                "invalid file type {} (expected one of: {})",
                self.file_type,
                FileType::VALID.join(", ")
            );
        }

        RunConfiguration::new(timestamp)
            .with_output(OutputSpec {
                directory: self.path.clone().unwrap_or_default(),
                name: self.name.clone(),
                file_type,
                include_date: self.include_date,
            })
            .with_target(DatabaseTarget {
                host: self.db_host.clone(),
                port: self.db_port,
                database: self.db_name.clone(),
                credentials: Credentials::new(self.db_user.as_str(), self.db_pass.as_str()),
                tables: TableSelection::parse(&self.tables, self.table_split()),
            })
    }

    /// Flags, then env file overrides, then validation.
    ///
    /// # Errors
    /// Returns an error if the env file cannot be read, holds an invalid
    /// port, or the merged configuration is incomplete.
    pub fn resolve(&self, timestamp: RunTimestamp) -> dbdump_core::Result<RunConfiguration> {
        let env = EnvFile::load_optional(self.config.as_deref())?;
        let config = self.flag_configuration(timestamp).with_env(&env)?;
        config.validate()?;
        Ok(config)
    }
}

/// Rewrites `-db_user`, `-config` and friends (and their `=value` forms)
/// to the double-dash spelling clap understands. Other arguments, including
/// everything after `--`, pass through untouched.
///
/// # Example
/// ```rust
/// use dbdump::normalize_legacy_args;
///
/// let args = normalize_legacy_args(["dbdump", "-db_name", "shop", "-config=.env", "-d"]);
/// assert_eq!(args, ["dbdump", "--db_name", "shop", "--config=.env", "-d"]);
/// ```
pub fn normalize_legacy_args<I, S>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let mut passthrough = false;
    args.into_iter()
        .map(Into::into)
        .map(|arg: OsString| {
            if passthrough {
                return arg;
            }
            let Some(text) = arg.to_str() else {
                return arg;
            };
            if text == "--" {
                passthrough = true;
                return arg;
            }
            let Some(flag) = text.strip_prefix('-').filter(|rest| !rest.starts_with('-')) else {
                return arg;
            };
            let name = flag.split_once('=').map_or(flag, |(name, _)| name);
            if LEGACY_LONG_FLAGS.contains(&name) {
                OsString::from(format!("-{text}"))
            } else {
                arg
            }
        })
        .collect()
}
