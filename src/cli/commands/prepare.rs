//! `prepare` command
//!
//! Validates the configuration, checks resumption, creates the run
//! directory and starts the run log. Prints the run directory on stdout so
//! a training launcher can pick it up.

use std::fs::File;

use tracing::{info, warn};

use crate::cli::args::PrepareArgs;
use crate::cli::commands::LogSettings;
use crate::config::{ConfigLoader, RunConfig};
use crate::error::TrainConfError;
use crate::run::{RunDirectory, plan_resume};

/// Prepare a training run.
///
/// Logging is installed only after the run directory exists, so every
/// event from this point on also lands in the run's `log.txt`.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the checkpoint cannot
/// be resumed, or the run directory cannot be created.
pub fn run(args: &PrepareArgs, logging: LogSettings) -> Result<(), TrainConfError> {
    let loaded = ConfigLoader::with_defaults().load(&args.config_file)?;
    let config = loaded.config;
    let resume = plan_resume(&config)?;

    let run_dir = RunDirectory::create(&args.log_root, &config, &args.config_file)?;
    logging.init(Some(File::create(run_dir.log_file())?));

    for warning in &loaded.warnings {
        warn!(
            location = warning.location.as_deref().unwrap_or("<unknown>"),
            "{}",
            warning.message
        );
    }

    info!(path = %run_dir.path().display(), "run directory created");
    log_summary(&config);

    if let Some(point) = &resume {
        info!(
            checkpoint = %point.checkpoint_file.display(),
            epochs = point.snapshot.training.num_epochs,
            "resuming from checkpoint"
        );
    }
    info!(checkpoint = %run_dir.checkpoint_file().display(), "checkpoints will be saved here");

    println!("{}", run_dir.path().display());
    Ok(())
}

fn log_summary(config: &RunConfig) {
    let dataset = config.dataset.name;
    info!(
        dataset = %dataset,
        num_classes = dataset.num_classes(),
        in_channels = dataset.in_channels(),
        "dataset"
    );
    info!(model = %config.model.name, "model");

    let training = &config.training;
    info!(
        optimizer = %training.optimizer.name,
        learning_rate = training.optimizer.learning_rate,
        momentum = training.optimizer.momentum,
        weight_decay = training.optimizer.weight_decay,
        scheduler = %training.scheduler.name(),
        num_epochs = training.num_epochs,
        train_batch = training.batch_size.train,
        val_batch = training.batch_size.val,
        "training"
    );

    if let Some(seed) = config.seed {
        warn!(
            seed,
            "manual seed set: deterministic kernels are enabled, training may be slower \
             and restarting from a checkpoint can behave unexpectedly"
        );
    }
}
