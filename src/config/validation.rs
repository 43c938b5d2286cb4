//! Configuration validation
//!
//! Builds a [`RunConfig`] from a parsed YAML document. Every field is read,
//! defaulted and range-checked, then cross-field constraints are applied.
//!
//! Validation collects ALL issues (doesn't stop at first) so one run of the
//! loader reports every violated field. A config is only produced when no
//! issue was found.

use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};

use crate::config::document::{DocumentReader, join};
use crate::config::loader::LoadWarning;
use crate::config::schema::{
    BatchSizeConfig, Choice, CosineKwargs, DatasetConfig, DatasetName, ExponentialKwargs, ModelConfig,
    ModelName, MultiStepKwargs, OptimizerConfig, OptimizerName, ResumeConfig, RunConfig,
    SchedulerConfig, SchedulerName, StepKwargs, TrainingConfig, defaults,
};
use crate::error::ConfigIssue;

// ============================================================================
// Known Keys
// ============================================================================

const ROOT_KEYS: &[&str] = &["model", "dataset", "seed", "training"];
const NAME_KEYS: &[&str] = &["name"];
const TRAINING_KEYS: &[&str] = &["num_epochs", "optimizer", "scheduler", "batch_size", "resume"];
const OPTIMIZER_KEYS: &[&str] = &["name", "learning_rate", "momentum", "weight_decay"];
const SCHEDULER_KEYS: &[&str] = &["name", "kwargs"];
const BATCH_SIZE_KEYS: &[&str] = &["train", "val"];
const RESUME_KEYS: &[&str] = &["from_checkpoint", "checkpoint_dir"];

const STEP_KWARGS: &[&str] = &["step_size", "gamma"];
const MULTISTEP_KWARGS: &[&str] = &["milestones", "gamma"];
const EXPONENTIAL_KWARGS: &[&str] = &["gamma"];
const COSINE_KWARGS: &[&str] = &["t_max", "eta_min"];

// ============================================================================
// Public API
// ============================================================================

/// Result of configuration validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// The configuration, present only when there are no errors.
    pub config: Option<RunConfig>,

    /// Validation errors (prevent loading).
    pub errors: Vec<ConfigIssue>,

    /// Validation warnings (informational).
    pub warnings: Vec<LoadWarning>,
}

impl ValidationResult {
    /// Returns `true` if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns `true` if validation passed (no errors).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Configuration validator.
///
/// Reads the document shape field by field through a [`DocumentReader`].
#[derive(Debug)]
pub struct Validator {
    reader: DocumentReader,
    verify_checkpoint_dir: bool,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    /// Creates a validator that checks the checkpoint directory on disk.
    #[must_use]
    pub fn new() -> Self {
        Self {
            reader: DocumentReader::new(),
            verify_checkpoint_dir: true,
        }
    }

    /// Enables or disables the on-disk checkpoint directory check.
    #[must_use]
    pub fn verify_checkpoint_dir(mut self, verify: bool) -> Self {
        self.verify_checkpoint_dir = verify;
        self
    }

    /// Validates a parsed document and returns the result.
    ///
    /// This method collects all errors and warnings rather than stopping
    /// at the first issue.
    pub fn validate(&mut self, document: &Value) -> ValidationResult {
        let config = self.read_document(document);
        let (errors, warnings) = std::mem::take(&mut self.reader).finish();

        ValidationResult {
            config: if errors.is_empty() { config } else { None },
            errors,
            warnings,
        }
    }

    // ========================================================================
    // Sections
    // ========================================================================

    fn read_document(&mut self, document: &Value) -> Option<RunConfig> {
        let root = self.reader.expect_mapping(document, "(document)")?;
        self.reader.warn_unknown_keys(root, ROOT_KEYS, "");

        let model = self.read_named::<ModelName>(root, "model");
        let dataset = self.read_named::<DatasetName>(root, "dataset");
        let seed = self.reader.optional_non_negative_int(root, "seed", "");
        let training = self.read_training(root);

        Some(RunConfig {
            model: ModelConfig { name: model? },
            dataset: DatasetConfig { name: dataset? },
            seed: seed?,
            training: training?,
        })
    }

    /// Reads a `{ name: <choice> }` section.
    fn read_named<C: Choice>(&mut self, root: &Mapping, key: &str) -> Option<C> {
        let section = self.reader.section(root, key, "")?;
        self.reader.warn_unknown_keys(section, NAME_KEYS, key);
        self.reader.choice::<C>(section, "name", key)
    }

    fn read_training(&mut self, root: &Mapping) -> Option<TrainingConfig> {
        const PATH: &str = "training";
        let training = self.reader.section(root, PATH, "")?;
        self.reader.warn_unknown_keys(training, TRAINING_KEYS, PATH);

        let num_epochs = self.reader.positive_int(training, "num_epochs", PATH);
        let optimizer = self.read_optimizer(training);
        let scheduler = self.read_scheduler(training);
        let batch_size = self.read_batch_size(training);
        let resume = self.read_resume(training);

        if let (Some(epochs), Some(SchedulerConfig::MultiStep(kwargs))) = (num_epochs, &scheduler) {
            for milestone in kwargs.milestones.iter().filter(|m| **m >= epochs) {
                self.reader.warn(
                    "training.scheduler.kwargs.milestones",
                    format!("Milestone {milestone} is never reached in a {epochs}-epoch run"),
                );
            }
        }

        Some(TrainingConfig {
            num_epochs: num_epochs?,
            optimizer: optimizer?,
            scheduler: scheduler?,
            batch_size: batch_size?,
            resume: resume?,
        })
    }

    fn read_optimizer(&mut self, training: &Mapping) -> Option<OptimizerConfig> {
        const PATH: &str = "training.optimizer";
        let optimizer = self.reader.section(training, "optimizer", "training")?;
        self.reader.warn_unknown_keys(optimizer, OPTIMIZER_KEYS, PATH);

        let name = self.reader.choice::<OptimizerName>(optimizer, "name", PATH);
        let learning_rate = self.reader.positive_float(optimizer, "learning_rate", PATH);
        let momentum =
            self.reader
                .non_negative_float_or(optimizer, "momentum", PATH, defaults::MOMENTUM);
        let weight_decay = self.reader.non_negative_float_or(
            optimizer,
            "weight_decay",
            PATH,
            defaults::WEIGHT_DECAY,
        );

        if let (Some(name), Some(momentum)) = (name, momentum) {
            let momentum_path = join(PATH, "momentum");
            if name == OptimizerName::NesterovSgd && momentum <= 0.0 {
                self.reader.issue(ConfigIssue::InconsistentState {
                    field: momentum_path,
                    message: "nesterov_sgd requires momentum > 0".to_string(),
                });
            } else if !name.uses_momentum() && momentum > 0.0 {
                self.reader.warn(
                    &momentum_path,
                    format!("Momentum {momentum} is ignored by the '{name}' optimizer"),
                );
            }
        }

        Some(OptimizerConfig {
            name: name?,
            learning_rate: learning_rate?,
            momentum: momentum?,
            weight_decay: weight_decay?,
        })
    }

    fn read_scheduler(&mut self, training: &Mapping) -> Option<SchedulerConfig> {
        const PATH: &str = "training.scheduler";
        const KWARGS_PATH: &str = "training.scheduler.kwargs";
        let scheduler = self.reader.section(training, "scheduler", "training")?;
        self.reader.warn_unknown_keys(scheduler, SCHEDULER_KEYS, PATH);

        let name = self.reader.choice::<SchedulerName>(scheduler, "name", PATH);
        let empty = Mapping::new();
        let kwargs = match DocumentReader::lookup(scheduler, "kwargs") {
            None => &empty,
            Some(value) => self.reader.expect_mapping(value, KWARGS_PATH)?,
        };
        let reader = &mut self.reader;

        match name? {
            SchedulerName::Constant => {
                reader.reject_unknown_keys(kwargs, &[], KWARGS_PATH);
                Some(SchedulerConfig::Constant)
            }
            SchedulerName::Step => {
                reader.reject_unknown_keys(kwargs, STEP_KWARGS, KWARGS_PATH);
                let step_size = reader.positive_int(kwargs, "step_size", KWARGS_PATH);
                let gamma = reader.optional_positive_float(kwargs, "gamma", KWARGS_PATH);
                Some(SchedulerConfig::Step(StepKwargs {
                    step_size: step_size?,
                    gamma: gamma?,
                }))
            }
            SchedulerName::MultiStep => {
                reader.reject_unknown_keys(kwargs, MULTISTEP_KWARGS, KWARGS_PATH);
                let milestones = read_milestones(reader, kwargs, KWARGS_PATH);
                let gamma = reader.optional_positive_float(kwargs, "gamma", KWARGS_PATH);
                Some(SchedulerConfig::MultiStep(MultiStepKwargs {
                    milestones: milestones?,
                    gamma: gamma?,
                }))
            }
            SchedulerName::Exponential => {
                reader.reject_unknown_keys(kwargs, EXPONENTIAL_KWARGS, KWARGS_PATH);
                let gamma = reader.positive_float(kwargs, "gamma", KWARGS_PATH);
                Some(SchedulerConfig::Exponential(ExponentialKwargs { gamma: gamma? }))
            }
            SchedulerName::Cosine => {
                reader.reject_unknown_keys(kwargs, COSINE_KWARGS, KWARGS_PATH);
                let t_max = reader.optional_positive_int(kwargs, "t_max", KWARGS_PATH);
                let eta_min = reader.optional_non_negative_float(kwargs, "eta_min", KWARGS_PATH);
                Some(SchedulerConfig::Cosine(CosineKwargs {
                    t_max: t_max?,
                    eta_min: eta_min?,
                }))
            }
        }
    }

    fn read_batch_size(&mut self, training: &Mapping) -> Option<BatchSizeConfig> {
        const PATH: &str = "training.batch_size";
        let batch_size = self.reader.section(training, "batch_size", "training")?;
        self.reader.warn_unknown_keys(batch_size, BATCH_SIZE_KEYS, PATH);

        let train = self.reader.positive_int(batch_size, "train", PATH);
        let val = self.reader.positive_int(batch_size, "val", PATH);

        Some(BatchSizeConfig {
            train: train?,
            val: val?,
        })
    }

    fn read_resume(&mut self, training: &Mapping) -> Option<ResumeConfig> {
        const PATH: &str = "training.resume";
        let Some(resume) = self.reader.optional_section(training, "resume", "training") else {
            return Some(ResumeConfig::default());
        };
        self.reader.warn_unknown_keys(resume, RESUME_KEYS, PATH);

        let from_checkpoint =
            self.reader
                .bool_or(resume, "from_checkpoint", PATH, defaults::FROM_CHECKPOINT);
        let checkpoint_dir = self
            .reader
            .optional_str(resume, "checkpoint_dir", PATH)
            .map(|dir| {
                dir.filter(|dir| !dir.trim().is_empty())
                    .map(PathBuf::from)
            });
        let (from_checkpoint, checkpoint_dir) = (from_checkpoint?, checkpoint_dir?);

        let dir_path = join(PATH, "checkpoint_dir");
        match (&checkpoint_dir, from_checkpoint) {
            (None, true) => self.reader.issue(ConfigIssue::InconsistentState {
                field: dir_path,
                message: "a non-empty checkpoint_dir is required when from_checkpoint is true"
                    .to_string(),
            }),
            (Some(dir), true) if self.verify_checkpoint_dir && !is_readable_dir(dir) => {
                self.reader.issue(ConfigIssue::InconsistentState {
                    field: dir_path,
                    message: format!(
                        "checkpoint directory '{}' does not exist or is not readable",
                        dir.display()
                    ),
                });
            }
            (Some(_), false) => self.reader.warn(
                &dir_path,
                "checkpoint_dir is ignored because from_checkpoint is false",
            ),
            _ => {}
        }

        Some(ResumeConfig {
            from_checkpoint,
            checkpoint_dir,
        })
    }
}

/// Reads a non-empty, strictly increasing list of positive epochs.
fn read_milestones(reader: &mut DocumentReader, kwargs: &Mapping, parent: &str) -> Option<Vec<u32>> {
    let path = join(parent, "milestones");
    let Some(value) = DocumentReader::lookup(kwargs, "milestones") else {
        reader.issue(ConfigIssue::Schema {
            field: path,
            message: "missing required field".to_string(),
        });
        return None;
    };
    let Some(items) = value.as_sequence().filter(|items| !items.is_empty()) else {
        reader.issue(ConfigIssue::Schema {
            field: path,
            message: "expected a non-empty list of epochs".to_string(),
        });
        return None;
    };

    let milestones: Vec<Option<u32>> = items
        .iter()
        .enumerate()
        .map(|(idx, item)| reader.positive_int_value(item, &format!("{path}[{idx}]")))
        .collect();
    let milestones: Vec<u32> = milestones.into_iter().collect::<Option<_>>()?;

    if milestones.windows(2).any(|pair| pair[0] >= pair[1]) {
        reader.issue(ConfigIssue::InconsistentState {
            field: path,
            message: format!("milestones must be strictly increasing, got {milestones:?}"),
        });
        return None;
    }
    Some(milestones)
}

fn is_readable_dir(path: &Path) -> bool {
    std::fs::read_dir(path).is_ok()
}

// ============================================================================
// Tests
// ============================================================================
