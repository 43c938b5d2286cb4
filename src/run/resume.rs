//! Resume planning.
//!
//! Before training resumes from a previous run directory, the snapshot of
//! that run's configuration must agree with the current one on the basic
//! settings, and the checkpoint file must be present.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::config::{ConfigLoader, LoaderOptions, RunConfig};
use crate::error::ConfigError;
use crate::run::directory::{CHECKPOINT_FILE, CONFIG_SNAPSHOT};

/// A validated point to resume training from.
#[derive(Debug, Clone)]
pub struct ResumePoint {
    /// Run directory being resumed
    pub checkpoint_dir: PathBuf,

    /// Checkpoint file inside `checkpoint_dir`
    pub checkpoint_file: PathBuf,

    /// Configuration the checkpoint was trained with
    pub snapshot: Arc<RunConfig>,
}

/// Checks that training can resume as `config` requests.
///
/// Returns `Ok(None)` when the configuration does not ask to resume.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be loaded, names a different
/// model or dataset, or the checkpoint file is missing.
pub fn plan_resume(config: &RunConfig) -> Result<Option<ResumePoint>, ConfigError> {
    let resume = &config.training.resume;
    let Some(checkpoint_dir) = resume.checkpoint_dir.as_deref().filter(|_| resume.from_checkpoint)
    else {
        return Ok(None);
    };

    // The snapshot's own resume section may point at a directory that is gone.
    let loader = ConfigLoader::new(LoaderOptions {
        verify_checkpoint_dir: false,
        ..LoaderOptions::default()
    });
    let snapshot = loader.load(&checkpoint_dir.join(CONFIG_SNAPSHOT))?.config;
    debug!(checkpoint_dir = %checkpoint_dir.display(), "checkpoint configuration loaded");

    check_compatible(config, &snapshot, checkpoint_dir)?;

    let checkpoint_file = checkpoint_dir.join(CHECKPOINT_FILE);
    if !checkpoint_file.is_file() {
        return Err(ConfigError::MissingCheckpoint {
            path: checkpoint_file,
        });
    }

    debug!(checkpoint = %checkpoint_file.display(), "checkpoint found");
    Ok(Some(ResumePoint {
        checkpoint_dir: checkpoint_dir.to_path_buf(),
        checkpoint_file,
        snapshot,
    }))
}

/// Requires the basic settings (model and dataset) to match the snapshot.
///
/// # Errors
///
/// Returns [`ConfigError::IncompatibleCheckpoint`] naming the first field
/// that differs.
pub fn check_compatible(
    current: &RunConfig,
    snapshot: &RunConfig,
    checkpoint_dir: &Path,
) -> Result<(), ConfigError> {
    let mismatch = |field: &str, checkpoint: String, current: String| {
        ConfigError::IncompatibleCheckpoint {
            checkpoint_dir: checkpoint_dir.to_path_buf(),
            field: field.to_string(),
            checkpoint,
            current,
        }
    };

    if current.model != snapshot.model {
        return Err(mismatch(
            "model.name",
            snapshot.model.name.to_string(),
            current.model.name.to_string(),
        ));
    }
    if current.dataset != snapshot.dataset {
        return Err(mismatch(
            "dataset.name",
            snapshot.dataset.name.to_string(),
            current.dataset.name.to_string(),
        ));
    }
    Ok(())
}
