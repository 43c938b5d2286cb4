//! `show` command
//!
//! Prints the resolved configuration with every default filled in.

use crate::cli::args::{ShowArgs, ShowFormat};
use crate::config::{ConfigLoader, RunConfig};
use crate::error::TrainConfError;

/// Print the resolved configuration.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or serialized.
pub fn run(args: &ShowArgs) -> Result<(), TrainConfError> {
    let result = ConfigLoader::with_defaults().load(&args.config_file)?;

    for warning in &result.warnings {
        tracing::warn!(
            location = warning.location.as_deref().unwrap_or("<unknown>"),
            "{}",
            warning.message
        );
    }

    print!("{}", render(&result.config, args.format)?);
    Ok(())
}

/// Renders a configuration in the requested format.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render(config: &RunConfig, format: ShowFormat) -> Result<String, TrainConfError> {
    Ok(match format {
        ShowFormat::Yaml => serde_yaml::to_string(config)?,
        ShowFormat::Json => serde_json::to_string_pretty(config)? + "\n",
    })
}
