//! Timestamp rendering for log lines and file name suffixes.

use chrono::{DateTime, Local};

/// Layout used in status lines: `MM-DD-YYYY HH:MM:SS`.
pub const DISPLAY_FORMAT: &str = "%m-%d-%Y %H:%M:%S";

/// Layout used in file names: `MM-DD-YYYY-HH-MM-SS`.
pub const KEBAB_FORMAT: &str = "%m-%d-%Y-%H-%M-%S";

/// Renders `moment` in the display layout, or the kebab-case layout when
/// `kebab` is true.
///
/// # Example
/// ```rust
/// use chrono::{Local, TimeZone};
/// use dbdump_core::timestamp::iso_date;
///
/// let moment = Local.with_ymd_and_hms(2024, 3, 7, 9, 5, 1).unwrap();
/// assert_eq!(iso_date(&moment, false), "03-07-2024 09:05:01");
/// assert_eq!(iso_date(&moment, true), "03-07-2024-09-05-01");
/// ```
pub fn iso_date(moment: &DateTime<Local>, kebab: bool) -> String {
    let format = if kebab { KEBAB_FORMAT } else { DISPLAY_FORMAT };
    moment.format(format).to_string()
}

/// The moment a run started, captured once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunTimestamp(DateTime<Local>);

impl RunTimestamp {
    /// Captures the current local time.
    pub fn now() -> Self {
        Self(Local::now())
    }

    /// Wraps an existing moment.
    pub const fn at(moment: DateTime<Local>) -> Self {
        Self(moment)
    }

    /// The captured moment.
    pub const fn moment(&self) -> &DateTime<Local> {
        &self.0
    }

    /// `MM-DD-YYYY HH:MM:SS`
    pub fn display(&self) -> String {
        iso_date(&self.0, false)
    }

    /// `MM-DD-YYYY-HH-MM-SS`, safe to embed in file names.
    pub fn kebab(&self) -> String {
        iso_date(&self.0, true)
    }
}

impl std::fmt::Display for RunTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(DISPLAY_FORMAT))
    }
}
