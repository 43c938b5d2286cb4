//! Per-run output directory.
//!
//! Every training run writes into its own directory named after the dataset,
//! the model and the local start time. The directory holds a snapshot of the
//! configuration file, the run log and the best checkpoint.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::debug;

use crate::config::RunConfig;
use crate::error::TrainConfError;

/// File name of the configuration snapshot inside a run directory.
pub const CONFIG_SNAPSHOT: &str = "config.yml";

/// File name of the run log inside a run directory.
pub const LOG_FILE: &str = "log.txt";

/// File name of the checkpoint inside a run directory.
pub const CHECKPOINT_FILE: &str = "ckpt.pth";

/// Timestamp layout used in run directory names.
const TIMESTAMP_FORMAT: &str = "%m_%d_%Y-%H:%M:%S";

/// A created run directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunDirectory {
    path: PathBuf,
}

impl RunDirectory {
    /// Builds the directory name for a run started at `started`.
    #[must_use]
    pub fn name_for(config: &RunConfig, started: DateTime<Local>) -> String {
        format!(
            "log-{}-{}-{}",
            config.dataset.name,
            config.model.name,
            started.format(TIMESTAMP_FORMAT)
        )
    }

    /// Creates the run directory under `root` and snapshots `source` into it.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the directory cannot be created or the
    /// configuration file cannot be copied.
    pub fn create(root: &Path, config: &RunConfig, source: &Path) -> Result<Self, TrainConfError> {
        Self::create_at(root, config, source, Local::now())
    }

    /// Same as [`RunDirectory::create`] with an explicit start time.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the directory cannot be created or the
    /// configuration file cannot be copied.
    pub fn create_at(
        root: &Path,
        config: &RunConfig,
        source: &Path,
        started: DateTime<Local>,
    ) -> Result<Self, TrainConfError> {
        let path = root.join(Self::name_for(config, started));
        fs::create_dir_all(&path)?;
        fs::copy(source, path.join(CONFIG_SNAPSHOT))?;

        debug!(path = %path.display(), "run directory created");
        Ok(Self { path })
    }

    /// Root of the run directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the configuration snapshot.
    #[must_use]
    pub fn config_snapshot(&self) -> PathBuf {
        self.path.join(CONFIG_SNAPSHOT)
    }

    /// Path of the run log.
    #[must_use]
    pub fn log_file(&self) -> PathBuf {
        self.path.join(LOG_FILE)
    }

    /// Path where the checkpoint is written.
    #[must_use]
    pub fn checkpoint_file(&self) -> PathBuf {
        self.path.join(CHECKPOINT_FILE)
    }
}
