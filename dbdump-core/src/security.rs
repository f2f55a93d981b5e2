//! Credential handling.
//!
//! The password lives in a zeroizing container, is never shown by `Debug`,
//! and is masked in any command line that gets logged.

use std::ffi::OsStr;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Replacement text for secrets in log output.
pub const MASK: &str = "****";

/// Secure credential container that automatically zeros memory on drop
#[derive(Clone, Default, Zeroize, ZeroizeOnDrop)]
pub struct Credentials {
    username: Zeroizing<String>,
    password: Zeroizing<String>,
}

impl Credentials {
    /// Creates new credentials with automatic memory zeroing
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Zeroizing::new(username.into()),
            password: Zeroizing::new(password.into()),
        }
    }

    /// The database user, empty when not set.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The password, empty when not set. Callers must not log this.
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Checks if password is present without exposing it
    pub fn has_password(&self) -> bool {
        !self.password.is_empty()
    }

    /// Returns a copy with the username replaced.
    #[must_use]
    pub fn with_username(&self, username: impl Into<String>) -> Self {
        Self::new(username, self.password.as_str())
    }

    /// Returns a copy with the password replaced.
    #[must_use]
    pub fn with_password(&self, password: impl Into<String>) -> Self {
        Self::new(self.username.as_str(), password)
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username.as_str())
            .field("password", &if self.has_password() { MASK } else { "" })
            .finish()
    }
}

/// Renders a command line for logging with any `--password=` value masked.
///
/// # Example
/// ```rust
/// use dbdump_core::security::redact_args;
///
/// let line = redact_args("mysqldump", ["--user=root", "--password=s3cret", "shop"]);
/// assert_eq!(line, "mysqldump --user=root --password=**** shop");
/// ```
pub fn redact_args<I, S>(program: &str, args: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut line = program.to_string();
    for arg in args {
        let arg = arg.as_ref().to_string_lossy();
        line.push(' ');
        if arg.starts_with("--password=") {
            line.push_str("--password=");
            line.push_str(MASK);
        } else {
            line.push_str(&arg);
        }
    }
    line
}
