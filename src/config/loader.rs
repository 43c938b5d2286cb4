//! Configuration loader
//!
//! This module implements the configuration loading pipeline:
//! 1. Size check and file read
//! 2. YAML parsing
//! 3. Validation and defaulting into a typed `RunConfig`
//! 4. Freeze with `Arc`
//!
//! Loading is atomic: either every field is valid and a config is returned,
//! or a single error describing every problem is returned.

use std::path::Path;
use std::sync::Arc;

use serde_yaml::Value;

use crate::config::schema::RunConfig;
use crate::config::validation::Validator;
use crate::error::ConfigError;

// ============================================================================
// Public API
// ============================================================================

/// Default maximum configuration file size (1 MiB).
const DEFAULT_MAX_CONFIG_SIZE: usize = 1024 * 1024;

/// Options for the configuration loader.
#[derive(Debug, Clone)]
pub struct LoaderOptions {
    /// Maximum configuration file size in bytes.
    pub max_config_size: usize,

    /// Whether to check that a resume `checkpoint_dir` exists on disk.
    pub verify_checkpoint_dir: bool,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            max_config_size: env_or("TRAINCONF_MAX_CONFIG_SIZE", DEFAULT_MAX_CONFIG_SIZE),
            verify_checkpoint_dir: true,
        }
    }
}

/// Result of loading a configuration.
#[derive(Debug)]
pub struct LoadResult {
    /// The loaded and validated configuration.
    pub config: Arc<RunConfig>,

    /// Warnings encountered during loading.
    pub warnings: Vec<LoadWarning>,
}

/// Warning during configuration loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadWarning {
    /// Warning message.
    pub message: String,

    /// Location where the warning occurred.
    pub location: Option<String>,
}

/// Configuration loader.
///
/// Handles the full loading pipeline from YAML file to frozen `RunConfig`.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    options: LoaderOptions,
}

impl ConfigLoader {
    /// Creates a new configuration loader with the given options.
    #[must_use]
    pub const fn new(options: LoaderOptions) -> Self {
        Self { options }
    }

    /// Creates a new configuration loader with default options.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(LoaderOptions::default())
    }

    /// Returns the loader options.
    #[must_use]
    pub const fn options(&self) -> &LoaderOptions {
        &self.options
    }

    /// Loads a configuration file and returns the frozen configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read or exceeds the size limit
    /// - YAML parsing fails or the document is empty
    /// - Validation fails
    pub fn load(&self, path: &Path) -> Result<LoadResult, ConfigError> {
        let metadata = std::fs::metadata(path).map_err(|_| ConfigError::MissingFile {
            path: path.to_path_buf(),
        })?;

        let file_size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
        if file_size > self.options.max_config_size {
            return Err(ConfigError::TooLarge {
                path: path.to_path_buf(),
                size: file_size,
                limit: self.options.max_config_size,
            });
        }

        let raw = std::fs::read(path).map_err(|_| ConfigError::MissingFile {
            path: path.to_path_buf(),
        })?;
        let content = String::from_utf8(raw).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            line: None,
            message: format!("file is not valid UTF-8: {e}"),
        })?;

        tracing::debug!(path = %path.display(), bytes = file_size, "loading configuration");
        self.load_str(&content, path)
    }

    /// Loads a configuration from YAML text.
    ///
    /// `source` labels the text in error messages.
    ///
    /// # Errors
    ///
    /// Returns an error if YAML parsing fails, the document is empty, or
    /// validation fails.
    pub fn load_str(&self, yaml: &str, source: &Path) -> Result<LoadResult, ConfigError> {
        // Handle UTF-8 BOM
        let yaml = yaml.strip_prefix('\u{feff}').unwrap_or(yaml);

        let document: Value = serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError {
            path: source.to_path_buf(),
            line: e.location().map(|l| l.line()),
            message: e.to_string(),
        })?;

        if document.is_null() {
            return Err(ConfigError::ParseError {
                path: source.to_path_buf(),
                line: None,
                message: "Configuration file is empty".to_string(),
            });
        }

        self.load_document(&document, &source.display().to_string())
    }

    /// Validates an already-parsed document and returns the frozen configuration.
    ///
    /// Missing optional keys are filled with their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] listing every violated field.
    pub fn load_document(&self, document: &Value, source: &str) -> Result<LoadResult, ConfigError> {
        let result = Validator::new()
            .verify_checkpoint_dir(self.options.verify_checkpoint_dir)
            .validate(document);

        match result.config {
            Some(config) if result.errors.is_empty() => {
                tracing::debug!(
                    source,
                    warnings = result.warnings.len(),
                    "configuration valid"
                );
                Ok(LoadResult {
                    config: Arc::new(config),
                    warnings: result.warnings,
                })
            }
            _ => Err(ConfigError::Invalid {
                source_name: source.to_string(),
                issues: result.errors,
            }),
        }
    }
}

/// Reads a numeric override from the environment, falling back to `default`.
fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ============================================================================
// Tests
// ============================================================================
