//! `KEY=VALUE` env file loading.
//!
//! The format is the one Laravel-style `.env` files use, read literally: the
//! first `=` splits key from value, both sides are trimmed, lines without a
//! `=` or with an empty key are skipped. Quotes and `#` are not interpreted.

use crate::error::DbDumpError;
use std::collections::HashMap;
use std::path::Path;

/// Database name key.
pub const DB_DATABASE: &str = "DB_DATABASE";
/// Database host key.
pub const DB_HOST: &str = "DB_HOST";
/// Database user key.
pub const DB_USERNAME: &str = "DB_USERNAME";
/// Database password key.
pub const DB_PASSWORD: &str = "DB_PASSWORD";
/// Database port key.
pub const DB_PORT: &str = "DB_PORT";

/// Keys that feed into the run configuration.
pub const RECOGNIZED_KEYS: [&str; 5] = [DB_DATABASE, DB_HOST, DB_USERNAME, DB_PASSWORD, DB_PORT];

/// Parsed contents of an env file.
#[derive(Default, Clone, PartialEq, Eq)]
pub struct EnvFile {
    entries: HashMap<String, String>,
}

// Values may hold credentials, so only keys are shown.
impl std::fmt::Debug for EnvFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keys: Vec<&String> = self.entries.keys().collect();
        keys.sort();
        f.debug_struct("EnvFile").field("keys", &keys).finish()
    }
}

impl EnvFile {
    /// Parses env file text. Never fails; malformed lines are skipped.
    ///
    /// # Example
    /// ```rust
    /// use dbdump_core::env_file::EnvFile;
    ///
    /// let env = EnvFile::parse("DB_HOST = db.internal\nnot a pair\nDB_PORT=3307\n");
    /// assert_eq!(env.get("DB_HOST"), Some("db.internal"));
    /// assert_eq!(env.get("DB_PORT"), Some("3307"));
    /// assert_eq!(env.len(), 2);
    /// ```
    pub fn parse(contents: &str) -> Self {
        let mut entries = HashMap::new();
        for line in contents.lines() {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            entries.insert(key.to_string(), value.trim().to_string());
        }
        Self { entries }
    }

    /// Reads and parses the file at `path`.
    ///
    /// # Errors
    /// Returns [`DbDumpError::EnvFile`] when the file is missing or unreadable.
    pub fn load(path: &Path) -> crate::Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| DbDumpError::EnvFile {
            path: path.to_path_buf(),
            source,
        })?;
        let env = Self::parse(&contents);
        tracing::debug!("Loaded {} entries from {}", env.len(), path.display());
        Ok(env)
    }

    /// Loads `path` when given, otherwise yields an empty mapping.
    pub fn load_optional(path: Option<&Path>) -> crate::Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    /// Value for `key`, if the file defined it.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Number of parsed entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no entries were parsed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_first_equals_splits() {
        let env = EnvFile::parse("DB_PASSWORD=a=b=c\n");
        assert_eq!(env.get(DB_PASSWORD), Some("a=b=c"));
    }

    #[test]
    fn test_whitespace_trimmed_and_empty_values_kept() {
        let env = EnvFile::parse("  DB_HOST  =   localhost  \nDB_PASSWORD=\n");
        assert_eq!(env.get(DB_HOST), Some("localhost"));
        assert_eq!(env.get(DB_PASSWORD), Some(""));
    }

    #[test]
    fn test_malformed_lines_ignored() {
        let env = EnvFile::parse("\nAPP_NAME\n=orphan\n   \nDB_PORT=3306\n");
        assert_eq!(env.len(), 1);
        assert_eq!(env.get(DB_PORT), Some("3306"));
        assert_eq!(env.get(""), None);
    }

    #[test]
    fn test_comments_not_interpreted() {
        let env = EnvFile::parse("#DB_HOST=commented\nDB_NAME=x # trailing\n");
        assert_eq!(env.get(DB_HOST), None);
        assert_eq!(env.get("#DB_HOST"), Some("commented"));
        assert_eq!(env.get("DB_NAME"), Some("x # trailing"));
    }

    #[test]
    fn test_later_duplicate_wins() {
        let env = EnvFile::parse("DB_HOST=first\nDB_HOST=second\n");
        assert_eq!(env.get(DB_HOST), Some("second"));
    }

    #[test]
    fn test_crlf_line_endings() {
        let env = EnvFile::parse("DB_HOST=winbox\r\nDB_PORT=3310\r\n");
        assert_eq!(env.get(DB_HOST), Some("winbox"));
        assert_eq!(env.get(DB_PORT), Some("3310"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "APP_ENV=production").unwrap();
        writeln!(file, "DB_DATABASE=shop").unwrap();
        let env = EnvFile::load(file.path()).unwrap();
        assert_eq!(env.get(DB_DATABASE), Some("shop"));
        assert_eq!(env.get("APP_ENV"), Some("production"));
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.env");
        let result = EnvFile::load(&missing);
        assert!(matches!(result, Err(DbDumpError::EnvFile { .. })));
    }

    #[test]
    fn test_load_optional_without_path_is_empty() {
        let env = EnvFile::load_optional(None).unwrap();
        assert!(env.is_empty());
    }

    #[test]
    fn test_debug_hides_values() {
        let env = EnvFile::parse("DB_PASSWORD=hunter2\n");
        let debug = format!("{env:?}");
        assert!(debug.contains("DB_PASSWORD"));
        assert!(!debug.contains("hunter2"));
    }
}
