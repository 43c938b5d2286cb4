//! `validate` command
//!
//! Loads each file independently and reports every problem found, in
//! human-readable or JSON form.

use std::path::Path;

use serde::Serialize;

use crate::cli::args::{OutputFormat, ValidateArgs};
use crate::config::{ConfigLoader, LoadWarning, LoaderOptions};
use crate::error::{ConfigError, IssueKind, TrainConfError};

/// Validation outcome for one file.
#[derive(Debug, Serialize)]
pub struct FileReport {
    /// File as given on the command line
    pub path: String,

    /// Whether the file passed (warnings count in strict mode)
    pub valid: bool,

    /// Errors that made the file invalid
    pub errors: Vec<ErrorReport>,

    /// Non-fatal findings
    pub warnings: Vec<WarningReport>,
}

/// One error in a [`FileReport`].
#[derive(Debug, Serialize)]
pub struct ErrorReport {
    /// Dotted field path, absent for file-level errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,

    /// Issue category, absent for file-level errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<IssueKind>,

    /// Rendered message
    pub message: String,
}

/// One warning in a [`FileReport`].
#[derive(Debug, Serialize)]
pub struct WarningReport {
    /// Dotted field path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Rendered message
    pub message: String,
}

impl From<&LoadWarning> for WarningReport {
    fn from(warning: &LoadWarning) -> Self {
        Self {
            location: warning.location.clone(),
            message: warning.message.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct Summary {
    total: usize,
    valid: usize,
    invalid: usize,
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    files: &'a [FileReport],
    summary: Summary,
}

/// Validate configuration files.
///
/// # Errors
///
/// Returns [`ConfigError::ValidationFailed`] if any file is invalid, or a
/// JSON error if the report cannot be rendered.
pub fn run(args: &ValidateArgs) -> Result<(), TrainConfError> {
    let loader = ConfigLoader::new(LoaderOptions {
        verify_checkpoint_dir: !args.no_checkpoint_check,
        ..LoaderOptions::default()
    });

    let reports: Vec<FileReport> = args
        .files
        .iter()
        .map(|path| check_file(&loader, path, args.strict))
        .collect();

    let invalid = reports.iter().filter(|r| !r.valid).count();

    match args.format {
        OutputFormat::Human => {
            for report in &reports {
                print_human(report);
            }
        }
        OutputFormat::Json => {
            let report = Report {
                files: &reports,
                summary: Summary {
                    total: reports.len(),
                    valid: reports.len() - invalid,
                    invalid,
                },
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    if invalid > 0 {
        return Err(ConfigError::ValidationFailed { count: invalid }.into());
    }
    Ok(())
}

/// Loads one file and turns the outcome into a report.
#[must_use]
pub fn check_file(loader: &ConfigLoader, path: &Path, strict: bool) -> FileReport {
    tracing::info!(file = %path.display(), "validating configuration");

    let (errors, warnings) = match loader.load(path) {
        Ok(result) => (Vec::new(), result.warnings),
        Err(ConfigError::Invalid { issues, .. }) => {
            let errors = issues
                .iter()
                .map(|issue| ErrorReport {
                    field: Some(issue.field().to_string()),
                    kind: Some(issue.kind()),
                    message: issue.to_string(),
                })
                .collect();
            (errors, Vec::new())
        }
        Err(e) => (
            vec![ErrorReport {
                field: None,
                kind: None,
                message: e.to_string(),
            }],
            Vec::new(),
        ),
    };

    for warning in &warnings {
        tracing::warn!(
            file = %path.display(),
            location = warning.location.as_deref().unwrap_or("<unknown>"),
            "{}",
            warning.message
        );
    }

    let valid = errors.is_empty() && !(strict && !warnings.is_empty());
    if valid {
        tracing::info!(file = %path.display(), "configuration valid");
    }

    FileReport {
        path: path.display().to_string(),
        valid,
        errors,
        warnings: warnings.iter().map(WarningReport::from).collect(),
    }
}

fn print_human(report: &FileReport) {
    let status = if report.valid { "ok" } else { "FAILED" };
    match report.warnings.len() {
        0 => println!("{}: {status}", report.path),
        n => println!("{}: {status} ({n} warning(s))", report.path),
    }
    for error in &report.errors {
        println!("  - {}", error.message);
    }
    if !report.valid && report.errors.is_empty() {
        for warning in &report.warnings {
            let location = warning.location.as_deref().unwrap_or("<unknown>");
            println!("  - warning at '{location}': {}", warning.message);
        }
    }
}
