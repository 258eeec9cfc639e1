//! Process-wide logging for training and evaluation runs.
//!
//! Lines take the form
//! `03/14/2025 09:26:53 - INFO - goemotions_korean::seed -   seeded random number generators`,
//! matching the layout the rest of the pipeline greps for.

use std::fmt;

use chrono::Local;
use thiserror::Error;
use tracing::{Event, Subscriber};
use tracing_subscriber::{
    EnvFilter,
    fmt::{FmtContext, FormatEvent, FormatFields, format::Writer},
    registry::LookupSpan,
};

/// Verbosity used when neither the caller nor `RUST_LOG` picks one.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// `strftime` pattern for the timestamp column.
pub const TIMESTAMP_FORMAT: &str = "%m/%d/%Y %H:%M:%S";

/// Errors raised while configuring logging.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log filter directive `{directive}`: {source}")]
    InvalidDirective {
        directive: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },
    #[error("invalid `{variable}` directive `{directive}`: {source}")]
    InvalidEnvDirective {
        variable: &'static str,
        directive: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },
}

/// Event formatter producing `<timestamp> - <LEVEL> - <target> -   <message>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineFormat;

impl<S, N> FormatEvent<S, N> for PipelineFormat
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
        let metadata = event.metadata();
        write!(
            writer,
            "{} - {} - {} -   ",
            Local::now().format(TIMESTAMP_FORMAT),
            metadata.level(),
            metadata.target()
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Build the event filter for `level`, letting a non-blank `RUST_LOG`
/// override it.
///
/// # Errors
///
/// Returns [`LoggingError::InvalidDirective`] if `level` cannot be parsed and
/// [`LoggingError::InvalidEnvDirective`] if `RUST_LOG` is set but malformed.
pub fn resolve_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    let configured =
        EnvFilter::try_new(level).map_err(|source| LoggingError::InvalidDirective {
            directive: level.to_owned(),
            source,
        })?;
    match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(directive) if !directive.trim().is_empty() => EnvFilter::try_new(&directive)
            .map_err(|source| LoggingError::InvalidEnvDirective {
                variable: EnvFilter::DEFAULT_ENV,
                directive,
                source,
            }),
        _ => Ok(configured),
    }
}

/// Install the global subscriber, writing to stderr.
///
/// `level` is an [`EnvFilter`] directive such as `info` or
/// `goemotions_korean=debug`. A set `RUST_LOG` overrides it.
///
/// Returns `Ok(false)` when a global subscriber was already installed; the
/// existing one is kept.
///
/// # Errors
///
/// Fails as [`resolve_filter`] does; nothing is installed in that case.
pub fn init_logger(level: &str) -> Result<bool, LoggingError> {
    let filter = resolve_filter(level)?;
    Ok(tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .event_format(PipelineFormat)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok())
}
