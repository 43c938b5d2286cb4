//! CLI command dispatch and handlers
//!
//! Routes parsed CLI arguments to the appropriate command handler.

pub mod prepare;
pub mod show;
pub mod validate;
pub mod version;

use std::fs::File;

use crate::cli::args::{Cli, ColorChoice, Commands};
use crate::error::TrainConfError;
use crate::observability::{LogFormat, init_logging};

/// Logging flags shared by every command.
#[derive(Debug, Clone, Copy)]
pub struct LogSettings {
    /// Output format
    pub format: LogFormat,
    /// `-v` count
    pub verbosity: u8,
    /// Color choice
    pub color: ColorChoice,
    /// `-q` given
    pub quiet: bool,
}

impl LogSettings {
    /// Installs the global subscriber; `--quiet` silences stderr only.
    pub fn init(self, log_file: Option<File>) {
        init_logging(
            self.format,
            self.verbosity,
            self.color,
            self.quiet,
            log_file,
        );
    }
}

/// Dispatch a parsed CLI invocation to the appropriate command handler.
///
/// `prepare` installs logging itself once the run log file exists; every
/// other command logs to stderr only.
///
/// # Errors
///
/// Returns an error if the dispatched command handler fails.
pub fn dispatch(cli: Cli) -> Result<(), TrainConfError> {
    let logging = LogSettings {
        format: cli.log_format,
        verbosity: cli.verbose,
        color: cli.color,
        quiet: cli.quiet,
    };

    if !matches!(cli.command, Commands::Prepare(_)) {
        logging.init(None);
    }

    match cli.command {
        Commands::Validate(args) => validate::run(&args),
        Commands::Show(args) => show::run(&args),
        Commands::Prepare(args) => prepare::run(&args, logging),
        Commands::Version(args) => version::run(&args),
    }
}
