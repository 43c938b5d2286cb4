//! Logging initialization.
//!
//! Provides structured logging via `tracing` with human-readable and
//! JSON output formats, configurable verbosity, and environment-based
//! override via `TRAINCONF_LOG_LEVEL`. When a run log file is supplied it
//! gets its own layer that records every event at debug level and above,
//! whatever the stderr verbosity.

use std::fs::File;
use std::io::IsTerminal;
use std::sync::Arc;

use clap::ValueEnum;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::cli::args::ColorChoice;

/// Environment variable that overrides the verbosity flags.
pub const LOG_LEVEL_ENV: &str = "TRAINCONF_LOG_LEVEL";

/// Level recorded in a run log file.
pub const LOG_FILE_LEVEL: LevelFilter = LevelFilter::DEBUG;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with optional ANSI colors.
    #[default]
    Human,
    /// Newline-delimited JSON for machine consumption.
    Json,
}

/// Maps a verbosity level to a tracing directive string.
///
/// - 0 → `"warn"`
/// - 1 → `"info"`
/// - 2 → `"debug"`
/// - 3+ → `"trace"` (saturates)
#[must_use]
pub const fn verbosity_to_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Initializes the global tracing subscriber.
///
/// Stderr output follows `verbosity`, unless `TRAINCONF_LOG_LEVEL` is set,
/// and is dropped entirely when `quiet` is set. `log_file` always receives
/// events at [`LOG_FILE_LEVEL`] and above, without ANSI colors.
///
/// Uses `try_init()` so calling this more than once (e.g. in tests) is safe.
pub fn init_logging(
    format: LogFormat,
    verbosity: u8,
    color: ColorChoice,
    quiet: bool,
    log_file: Option<File>,
) {
    let show_target = verbosity >= 2;
    let mut layers: Vec<BoxedLayer> = Vec::new();

    if !quiet {
        let filter = EnvFilter::try_from_env(LOG_LEVEL_ENV)
            .unwrap_or_else(|_| EnvFilter::new(verbosity_to_directive(verbosity)));
        let use_ansi = match color {
            ColorChoice::Auto => {
                std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none()
            }
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        };
        layers.push(
            fmt_layer(format, show_target, use_ansi, std::io::stderr)
                .with_filter(filter)
                .boxed(),
        );
    }

    if let Some(file) = log_file {
        layers.push(
            fmt_layer(format, show_target, false, Arc::new(file))
                .with_filter(LOG_FILE_LEVEL)
                .boxed(),
        );
    }

    if !layers.is_empty() {
        let _ = tracing_subscriber::registry().with(layers).try_init();
    }
}

/// Builds an unfiltered formatting layer writing to `writer`.
fn fmt_layer<W>(format: LogFormat, show_target: bool, ansi: bool, writer: W) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    match format {
        LogFormat::Human => tracing_subscriber::fmt::layer()
            .with_ansi(ansi)
            .with_target(show_target)
            .with_writer(writer)
            .boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_target(show_target)
            .with_writer(writer)
            .boxed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_format_default_is_human() {
        assert_eq!(LogFormat::default(), LogFormat::Human);
    }

    #[test]
    fn init_logging_does_not_panic() {
        // Second call returns Err from try_init and is ignored
        init_logging(LogFormat::Human, 0, ColorChoice::Auto, false, None);
        init_logging(LogFormat::Json, 3, ColorChoice::Never, false, None);
    }

    #[test]
    fn init_logging_accepts_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = File::create(dir.path().join("log.txt")).unwrap();
        init_logging(LogFormat::Human, 1, ColorChoice::Never, true, Some(file));
    }

    #[test]
    fn verbosity_levels() {
        assert_eq!(verbosity_to_directive(0), "warn");
        assert_eq!(verbosity_to_directive(1), "info");
        assert_eq!(verbosity_to_directive(2), "debug");
        assert_eq!(verbosity_to_directive(3), "trace");
        assert_eq!(verbosity_to_directive(255), "trace");
    }
}
