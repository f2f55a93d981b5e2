//! Status line logging.
//!
//! Every event is written to stdout as `{MM-DD-YYYY HH:MM:SS} :: {message}`.
//! Levels only decide what gets printed; they never appear in the line.

use crate::Result;
use crate::timestamp::iso_date;
use std::fmt;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// Event formatter producing `{timestamp} :: {message}` lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusLineFormat;

impl<S, N> FormatEvent<S, N> for StatusLineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        write!(writer, "{} :: ", iso_date(&chrono::Local::now(), false))?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Maps the CLI verbosity flags to a maximum level.
///
/// `quiet` wins over any verbosity; 0=INFO, 1=DEBUG, 2+=TRACE.
pub const fn level_for(verbose: u8, quiet: bool) -> Level {
    match (quiet, verbose) {
        (true, _) => Level::ERROR,
        (false, 0) => Level::INFO,
        (false, 1) => Level::DEBUG,
        (false, _) => Level::TRACE,
    }
}

/// Initializes status line logging based on verbosity level.
///
/// `RUST_LOG`, when set, takes precedence over the flag-derived level.
///
/// # Example
/// ```rust,no_run
/// use dbdump_core::logging::init_logging;
///
/// init_logging(0, false).expect("Failed to initialize logging");
/// tracing::info!("dumping database...");
/// ```
pub fn init_logging(verbose: u8, quiet: bool) -> Result<()> {
    let level = level_for(verbose, quiet);
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stdout)
        .event_format(StatusLineFormat)
        .try_init()
        .map_err(|e| {
            crate::error::DbDumpError::configuration(format!(
                "Failed to initialize logging: {e}"
            ))
        })?;

    Ok(())
}
