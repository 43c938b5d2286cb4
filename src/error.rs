//! Error types for `trainconf`
//!
//! This module provides the error hierarchy used across the crate: the
//! individual configuration issues collected during validation, the
//! configuration errors returned by the loader, and the top-level error that
//! maps onto process exit codes.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `trainconf` CLI operations.
///
/// These codes follow Unix conventions.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// Configuration error (invalid YAML, validation failure, bad checkpoint)
    pub const CONFIG_ERROR: i32 = 2;

    /// I/O error (file not found, permission denied)
    pub const IO_ERROR: i32 = 3;

    /// Usage error (invalid arguments, missing required options)
    pub const USAGE_ERROR: i32 = 64;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `trainconf` operations.
///
/// Aggregates the domain-specific errors and provides a single place to map
/// them onto exit codes.
#[derive(Debug, Error)]
pub enum TrainConfError {
    /// Configuration loading, validation or resume error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl TrainConfError {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(ConfigError::MissingFile { .. }) | Self::Io(_) => ExitCode::IO_ERROR,
            Self::Config(_) | Self::Yaml(_) => ExitCode::CONFIG_ERROR,
            Self::Json(_) => ExitCode::ERROR,
        }
    }
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// Configuration loading and validation errors.
///
/// Validation failures are never reported one at a time: every violated
/// field of a document ends up in a single [`ConfigError::Invalid`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// YAML parsing failed
    #[error("parse error in {path}{}: {message}", .line.map_or_else(String::new, |l| format!(" (line {l})")))]
    ParseError {
        /// Path (or label) of the configuration source
        path: PathBuf,
        /// Line number where the error occurred (if available)
        line: Option<usize>,
        /// Error message from the parser
        message: String,
    },

    /// Configuration file not found or unreadable
    #[error("file not found: {path}")]
    MissingFile {
        /// Path to the missing file
        path: PathBuf,
    },

    /// Configuration file exceeds the size limit
    #[error("configuration file {path} is {size} bytes (limit: {limit})")]
    TooLarge {
        /// Path to the oversized file
        path: PathBuf,
        /// Actual size in bytes
        size: usize,
        /// Configured limit in bytes
        limit: usize,
    },

    /// One or more fields of the configuration are invalid
    #[error("invalid configuration in {source_name}:{}", render_issues(.issues))]
    Invalid {
        /// Path (or label) of the configuration source
        source_name: String,
        /// Every issue found, in document order
        issues: Vec<ConfigIssue>,
    },

    /// Checkpoint snapshot does not match the current run
    #[error(
        "cannot resume from {checkpoint_dir}: '{field}' is '{checkpoint}' in the checkpoint but '{current}' in this run"
    )]
    IncompatibleCheckpoint {
        /// Checkpoint directory being resumed from
        checkpoint_dir: PathBuf,
        /// Field that differs
        field: String,
        /// Value recorded in the checkpoint snapshot
        checkpoint: String,
        /// Value in the current configuration
        current: String,
    },

    /// Checkpoint file is missing from the checkpoint directory
    #[error("checkpoint file not found: {path}")]
    MissingCheckpoint {
        /// Expected checkpoint file path
        path: PathBuf,
    },

    /// One or more configuration files failed validation.
    #[error("{count} file(s) failed validation")]
    ValidationFailed {
        /// Number of files that failed validation.
        count: usize,
    },
}

impl ConfigError {
    /// Returns the collected issues for an [`ConfigError::Invalid`] error.
    #[must_use]
    pub fn issues(&self) -> &[ConfigIssue] {
        match self {
            Self::Invalid { issues, .. } => issues,
            _ => &[],
        }
    }
}

fn render_issues(issues: &[ConfigIssue]) -> String {
    issues.iter().fold(String::new(), |mut out, issue| {
        out.push_str("\n  - ");
        out.push_str(&issue.to_string());
        out
    })
}

// ============================================================================
// Validation Issues
// ============================================================================

/// A single violated constraint found while validating a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigIssue {
    /// Structural problem: missing required field, wrong type, unexpected key.
    #[error("schema error at '{field}': {message}")]
    Schema {
        /// Dotted path of the field
        field: String,
        /// What is wrong with it
        message: String,
    },

    /// Value is not a member of the field's closed set.
    #[error(
        "invalid choice for '{field}': got '{value}', expected one of [{}]{}",
        .allowed.join(", "),
        .suggestion.map_or_else(String::new, |s| format!(" (did you mean '{s}'?)"))
    )]
    InvalidChoice {
        /// Dotted path of the field
        field: String,
        /// The value supplied
        value: String,
        /// The accepted values
        allowed: Vec<&'static str>,
        /// Closest accepted value, if one is near enough
        suggestion: Option<&'static str>,
    },

    /// Numeric value outside its permitted range.
    #[error("out of range value for '{field}': got {value}, expected {constraint}")]
    Range {
        /// Dotted path of the field
        field: String,
        /// The value supplied, rendered as text
        value: String,
        /// Human-readable constraint (e.g. "a value > 0")
        constraint: String,
    },

    /// Cross-field constraint violated.
    #[error("inconsistent configuration at '{field}': {message}")]
    InconsistentState {
        /// Dotted path of the field the constraint is anchored on
        field: String,
        /// What is inconsistent
        message: String,
    },
}

impl ConfigIssue {
    /// Returns the dotted path of the offending field.
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Self::Schema { field, .. }
            | Self::InvalidChoice { field, .. }
            | Self::Range { field, .. }
            | Self::InconsistentState { field, .. } => field,
        }
    }

    /// Returns the category of this issue.
    #[must_use]
    pub const fn kind(&self) -> IssueKind {
        match self {
            Self::Schema { .. } => IssueKind::Schema,
            Self::InvalidChoice { .. } => IssueKind::InvalidChoice,
            Self::Range { .. } => IssueKind::Range,
            Self::InconsistentState { .. } => IssueKind::InconsistentState,
        }
    }
}

/// Category of a [`ConfigIssue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Missing field, wrong type or unexpected key
    Schema,
    /// Value outside a closed set
    InvalidChoice,
    /// Numeric range violation
    Range,
    /// Cross-field constraint violation
    InconsistentState,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Schema => write!(f, "schema"),
            Self::InvalidChoice => write!(f, "invalid_choice"),
            Self::Range => write!(f, "range"),
            Self::InconsistentState => write!(f, "inconsistent_state"),
        }
    }
}

// ============================================================================
// Result Type Alias
// ============================================================================

/// Result type alias for `trainconf` operations.
pub type Result<T> = std::result::Result<T, TrainConfError>;

// ============================================================================
// Tests
// ============================================================================
