//! Run configuration.
//!
//! A [`RunConfiguration`] is assembled once from defaults, command-line
//! flags and an optional env file, then passed by reference into every
//! stage. Nothing mutates it after [`RunConfiguration::validate`] succeeds.

use crate::env_file::{self, EnvFile};
use crate::error::DbDumpError;
use crate::security::Credentials;
use crate::timestamp::RunTimestamp;
use std::path::{Path, PathBuf};

/// Default MySQL port.
pub const DEFAULT_PORT: u16 = 3306;

/// Default output base name.
pub const DEFAULT_NAME: &str = "dump";

/// Table list value meaning "every table".
pub const ALL_TABLES: &str = "*";

/// Number of commas the legacy table splitter replaces.
pub const LEGACY_COMMA_LIMIT: usize = 3;

/// Requested output type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileType {
    /// Plain dump, no compression
    Sql,
    /// Dump plus a `.zip` sibling
    Zip,
    /// Dump plus a `.gz` sibling
    Gz,
    /// Anything else; kept as given, never compressed
    Unrecognized(String),
}

impl FileType {
    /// Names accepted on the command line.
    pub const VALID: [&'static str; 3] = ["sql", "zip", "gz"];

    /// Maps a flag value to a file type. Matching is exact.
    pub fn from_flag(value: &str) -> Self {
        match value {
            "sql" => Self::Sql,
            "zip" => Self::Zip,
            "gz" => Self::Gz,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    /// True for `sql`, `zip` and `gz`.
    pub const fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }

    /// The compression step this type asks for, if any.
    pub const fn compression(&self) -> Option<Compression> {
        match self {
            Self::Zip => Some(Compression::Zip),
            Self::Gz => Some(Compression::Gzip),
            Self::Sql | Self::Unrecognized(_) => None,
        }
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sql => f.write_str("sql"),
            Self::Zip => f.write_str("zip"),
            Self::Gz => f.write_str("gz"),
            Self::Unrecognized(other) => f.write_str(other),
        }
    }
}

/// External compressor to run after the dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    /// `zip {out}.zip {out}`
    Zip,
    /// `gzip -c {out} > {out}.gz`
    Gzip,
}

impl Compression {
    /// Extension appended to the dump path for the compressed sibling.
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Zip => "zip",
            Self::Gzip => "gz",
        }
    }
}

/// How the comma-separated table list is split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableSplit {
    /// Every comma separates two tables
    #[default]
    All,
    /// Only the first three commas separate tables
    Legacy,
}

/// Tables passed to the dump tool.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TableSelection {
    /// No table filter
    #[default]
    All,
    /// Only these tables, in order
    Only(Vec<String>),
}

impl TableSelection {
    /// Parses the `-t` flag value.
    ///
    /// `*` selects every table. Otherwise commas become spaces and the
    /// result is split on whitespace, so `a, b` and `a,b` agree.
    ///
    /// # Example
    /// ```rust
    /// use dbdump_core::config::{TableSelection, TableSplit};
    ///
    /// let all = TableSelection::parse("a,b,c,d,e", TableSplit::All);
    /// assert_eq!(all.argument(), "a b c d e");
    ///
    /// let legacy = TableSelection::parse("a,b,c,d,e", TableSplit::Legacy);
    /// assert_eq!(legacy.argument(), "a b c d,e");
    /// ```
    pub fn parse(raw: &str, split: TableSplit) -> Self {
        if raw == ALL_TABLES {
            return Self::All;
        }
        let spaced = match split {
            TableSplit::All => raw.replace(',', " "),
            TableSplit::Legacy => raw.replacen(',', " ", LEGACY_COMMA_LIMIT),
        };
        let tables: Vec<String> = spaced.split_whitespace().map(str::to_string).collect();
        if tables.is_empty() {
            Self::All
        } else {
            Self::Only(tables)
        }
    }

    /// Table names as separate arguments, empty for [`TableSelection::All`].
    pub fn names(&self) -> &[String] {
        match self {
            Self::All => &[],
            Self::Only(tables) => tables.as_slice(),
        }
    }

    /// Space-joined table argument, empty for [`TableSelection::All`].
    pub fn argument(&self) -> String {
        self.names().join(" ")
    }
}

/// Where the dump lands and how it is named.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSpec {
    /// Output path prefix, empty for the working directory. Include the
    /// trailing separator for a directory (`/var/backups/`); without one the
    /// last component becomes a file name prefix (`/var/backups/nightly-`).
    pub directory: PathBuf,
    /// Base file name
    pub name: String,
    /// Requested output type
    pub file_type: FileType,
    /// Append the kebab-case run timestamp to the file name
    pub include_date: bool,
}

impl Default for OutputSpec {
    fn default() -> Self {
        Self {
            directory: PathBuf::new(),
            name: DEFAULT_NAME.to_string(),
            file_type: FileType::Sql,
            include_date: false,
        }
    }
}

impl OutputSpec {
    /// `{directory}{name}{timestamp-or-empty}`, concatenated as-is.
    pub fn dump_path(&self, timestamp: &RunTimestamp) -> PathBuf {
        let mut path = self.directory.as_os_str().to_os_string();
        path.push(&self.name);
        if self.include_date {
            path.push(timestamp.kebab());
        }
        PathBuf::from(path)
    }
}

/// Database connection settings handed to the dump tool.
///
/// # Security
/// `Display` omits credentials entirely; `Debug` masks the password.
#[derive(Debug, Clone)]
pub struct DatabaseTarget {
    /// Host, empty to let the dump tool pick its default
    pub host: String,
    /// TCP port
    pub port: u16,
    /// Database (schema) name
    pub database: String,
    /// User and password
    pub credentials: Credentials,
    /// Tables to dump
    pub tables: TableSelection,
}

impl Default for DatabaseTarget {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: DEFAULT_PORT,
            database: String::new(),
            credentials: Credentials::default(),
            tables: TableSelection::All,
        }
    }
}

impl std::fmt::Display for DatabaseTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let host = if self.host.is_empty() {
            "localhost"
        } else {
            &self.host
        };
        write!(f, "{}:{}/{}", host, self.port, self.database)
    }
}

impl DatabaseTarget {
    /// Overrides fields with the recognized keys present in `env`.
    ///
    /// Keys absent from the file leave the current value alone. An empty
    /// `DB_PORT` keeps the current port.
    ///
    /// # Errors
    /// Returns a configuration error when `DB_PORT` is not a valid port.
    pub fn apply_env(&mut self, env: &EnvFile) -> crate::Result<()> {
        if let Some(database) = env.get(env_file::DB_DATABASE) {
            self.database = database.to_string();
        }
        if let Some(host) = env.get(env_file::DB_HOST) {
            self.host = host.to_string();
        }
        if let Some(username) = env.get(env_file::DB_USERNAME) {
            self.credentials = self.credentials.with_username(username);
        }
        if let Some(password) = env.get(env_file::DB_PASSWORD) {
            self.credentials = self.credentials.with_password(password);
        }
        if let Some(port) = env.get(env_file::DB_PORT).filter(|p| !p.is_empty()) {
            self.port = port.parse().map_err(|_| {
                DbDumpError::configuration(format!(
                    "{} must be a port number between 1 and 65535",
                    env_file::DB_PORT
                ))
            })?;
        }
        Ok(())
    }
}

/// Everything one run needs.
#[derive(Debug, Clone)]
pub struct RunConfiguration {
    /// Output naming
    pub output: OutputSpec,
    /// Connection settings
    pub target: DatabaseTarget,
    /// Captured once at start-up
    pub timestamp: RunTimestamp,
}

impl RunConfiguration {
    /// Creates a configuration with default output and target settings.
    pub fn new(timestamp: RunTimestamp) -> Self {
        Self {
            output: OutputSpec::default(),
            target: DatabaseTarget::default(),
            timestamp,
        }
    }

    /// Builder method to set the output settings.
    #[must_use]
    pub fn with_output(mut self, output: OutputSpec) -> Self {
        self.output = output;
        self
    }

    /// Builder method to set the connection settings.
    #[must_use]
    pub fn with_target(mut self, target: DatabaseTarget) -> Self {
        self.target = target;
        self
    }

    /// Applies env file overrides. See [`DatabaseTarget::apply_env`].
    ///
    /// # Errors
    /// Propagates configuration errors from the env values.
    pub fn with_env(mut self, env: &EnvFile) -> crate::Result<Self> {
        self.target.apply_env(env)?;
        Ok(self)
    }

    /// Path the dump tool writes to.
    pub fn dump_path(&self) -> PathBuf {
        self.output.dump_path(&self.timestamp)
    }

    /// Path of the compressed sibling, if compression was requested.
    pub fn compressed_path(&self) -> Option<PathBuf> {
        self.output
            .file_type
            .compression()
            .map(|compression| sibling_path(&self.dump_path(), compression.extension()))
    }

    /// Validates values the dump tool cannot work without.
    ///
    /// The file type is deliberately not checked here; an unrecognized type
    /// only produces a warning.
    ///
    /// # Errors
    /// Returns error if the database name is empty, the port is 0 or the
    /// output name is empty
    pub fn validate(&self) -> crate::Result<()> {
        if self.target.database.is_empty() {
            return Err(DbDumpError::configuration(
                "database name is required (-db_name or DB_DATABASE)",
            ));
        }

        if self.target.port == 0 {
            return Err(DbDumpError::configuration("port must be greater than 0"));
        }

        if self.output.name.is_empty() {
            return Err(DbDumpError::configuration("output file name cannot be empty"));
        }

        Ok(())
    }
}

/// `{path}.{extension}`, keeping any extension `path` already has.
pub fn sibling_path(path: &Path, extension: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    fn fixed_timestamp() -> RunTimestamp {
        RunTimestamp::at(Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap())
    }

    #[test]
    fn test_file_type_from_flag() {
        assert_eq!(FileType::from_flag("sql"), FileType::Sql);
        assert_eq!(FileType::from_flag("zip"), FileType::Zip);
        assert_eq!(FileType::from_flag("gz"), FileType::Gz);

        let other = FileType::from_flag("ZIP");
        assert!(!other.is_recognized());
        assert_eq!(other.to_string(), "ZIP");
        assert_eq!(other.compression(), None);
    }

    #[test]
    fn test_compression_per_file_type() {
        assert_eq!(FileType::Sql.compression(), None);
        assert_eq!(FileType::Zip.compression(), Some(Compression::Zip));
        assert_eq!(FileType::Gz.compression(), Some(Compression::Gzip));
    }

    #[test]
    fn test_star_selects_all_tables() {
        let tables = TableSelection::parse("*", TableSplit::All);
        assert_eq!(tables, TableSelection::All);
        assert_eq!(tables.argument(), "");
        assert!(tables.names().is_empty());
    }

    #[test]
    fn test_three_tables() {
        for split in [TableSplit::All, TableSplit::Legacy] {
            let tables = TableSelection::parse("a,b,c", split);
            assert_eq!(tables.argument(), "a b c");
            assert_eq!(tables.names(), ["a", "b", "c"]);
        }
    }

    #[test]
    fn test_legacy_split_stops_after_three_commas() {
        let tables = TableSelection::parse("users,orders,items,logs,audit", TableSplit::Legacy);
        assert_eq!(tables.names(), ["users", "orders", "items", "logs,audit"]);
    }

    #[test]
    fn test_default_split_replaces_every_comma() {
        let tables = TableSelection::parse("users,orders,items,logs,audit", TableSplit::All);
        assert_eq!(tables.names().len(), 5);
    }

    #[test]
    fn test_table_list_whitespace_and_empty_entries() {
        let tables = TableSelection::parse(" users , orders,,", TableSplit::All);
        assert_eq!(tables.names(), ["users", "orders"]);

        assert_eq!(TableSelection::parse("", TableSplit::All), TableSelection::All);
        assert_eq!(TableSelection::parse(",", TableSplit::All), TableSelection::All);
    }

    #[test]
    fn test_dump_path_without_date() {
        let output = OutputSpec {
            directory: PathBuf::from("/var/backups/"),
            ..OutputSpec::default()
        };
        assert_eq!(
            output.dump_path(&fixed_timestamp()),
            PathBuf::from("/var/backups/dump")
        );
    }

    #[test]
    fn test_dump_path_directory_is_a_prefix() {
        let output = OutputSpec {
            directory: PathBuf::from("/var/backups/nightly-"),
            name: "shop".to_string(),
            ..OutputSpec::default()
        };
        assert_eq!(
            output.dump_path(&fixed_timestamp()),
            PathBuf::from("/var/backups/nightly-shop")
        );

        let dated = OutputSpec {
            include_date: true,
            ..output
        };
        assert_eq!(
            dated.dump_path(&fixed_timestamp()),
            PathBuf::from("/var/backups/nightly-shop01-02-2024-03-04-05")
        );
    }

    #[test]
    fn test_dump_path_with_date_and_empty_directory() {
        let output = OutputSpec {
            name: "shop".to_string(),
            include_date: true,
            ..OutputSpec::default()
        };
        assert_eq!(
            output.dump_path(&fixed_timestamp()),
            PathBuf::from("shop01-02-2024-03-04-05")
        );
    }

    #[test]
    fn test_compressed_path() {
        let config = RunConfiguration::new(fixed_timestamp()).with_output(OutputSpec {
            file_type: FileType::Gz,
            name: "db.sql".to_string(),
            ..OutputSpec::default()
        });
        assert_eq!(config.compressed_path(), Some(PathBuf::from("db.sql.gz")));

        let plain = RunConfiguration::new(fixed_timestamp());
        assert_eq!(plain.compressed_path(), None);
    }

    #[test]
    fn test_env_overrides_recognized_keys() {
        let mut target = DatabaseTarget {
            host: "flag-host".to_string(),
            port: 3307,
            database: "flag_db".to_string(),
            credentials: Credentials::new("flag_user", "flag_pass"),
            tables: TableSelection::All,
        };
        let env = EnvFile::parse(
            "DB_HOST=env-host\nDB_PORT=3310\nDB_DATABASE=env_db\n\
             DB_USERNAME=env_user\nDB_PASSWORD=env_pass\nDB_CONNECTION=mysql\n",
        );

        target.apply_env(&env).unwrap();

        assert_eq!(target.host, "env-host");
        assert_eq!(target.port, 3310);
        assert_eq!(target.database, "env_db");
        assert_eq!(target.credentials.username(), "env_user");
        assert_eq!(target.credentials.password(), "env_pass");
    }

    #[test]
    fn test_env_absent_keys_keep_flags() {
        let mut target = DatabaseTarget {
            host: "flag-host".to_string(),
            credentials: Credentials::new("flag_user", "flag_pass"),
            ..DatabaseTarget::default()
        };
        target
            .apply_env(&EnvFile::parse("DB_DATABASE=only_db\nDB_PORT=\n"))
            .unwrap();

        assert_eq!(target.host, "flag-host");
        assert_eq!(target.port, DEFAULT_PORT);
        assert_eq!(target.database, "only_db");
        assert_eq!(target.credentials.username(), "flag_user");
        assert_eq!(target.credentials.password(), "flag_pass");
    }

    #[test]
    fn test_env_invalid_port_is_error_without_value() {
        let mut target = DatabaseTarget::default();
        let err = target
            .apply_env(&EnvFile::parse("DB_PORT=notaport\n"))
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("DB_PORT"));
        assert!(!message.contains("notaport"));
    }

    #[test]
    fn test_validate() {
        let config = RunConfiguration::new(fixed_timestamp());
        assert!(config.validate().is_err());

        let config = config.with_target(DatabaseTarget {
            database: "shop".to_string(),
            ..DatabaseTarget::default()
        });
        assert!(config.validate().is_ok());

        let mut zero_port = config.clone();
        zero_port.target.port = 0;
        assert!(zero_port.validate().is_err());

        let mut unnamed = config.clone();
        unnamed.output.name.clear();
        assert!(unnamed.validate().is_err());

        // Unrecognized file types only warn
        let mut odd = config;
        odd.output.file_type = FileType::from_flag("tar");
        assert!(odd.validate().is_ok());
    }

    #[test]
    fn test_target_display_and_debug_hide_password() {
        let target = DatabaseTarget {
            host: "db.internal".to_string(),
            database: "shop".to_string(),
            credentials: Credentials::new("admin_user", "super_secret_password_123"),
            ..DatabaseTarget::default()
        };
        let display = target.to_string();
        assert_eq!(display, "db.internal:3306/shop");
        assert!(!display.contains("admin_user"));

        let debug = format!("{target:?}");
        assert!(!debug.contains("super_secret_password_123"));
    }
}
