//! Configuration schema types
//!
//! This module defines the typed run configuration produced by the loader.
//! Values are never deserialized into these types directly: the validator
//! builds them from the parsed YAML document so that every violation can be
//! reported at once. The types derive `Serialize` so a resolved configuration
//! can be written back out in the same document shape.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

// ============================================================================
// Defaults
// ============================================================================

/// Default values filled in for omitted optional fields.
pub mod defaults {
    /// `seed` when omitted: no manual seed, the run is non-reproducible.
    pub const SEED: Option<u64> = None;

    /// `training.resume.from_checkpoint` when omitted.
    pub const FROM_CHECKPOINT: bool = false;

    /// `training.optimizer.momentum` when omitted.
    pub const MOMENTUM: f64 = 0.0;

    /// `training.optimizer.weight_decay` when omitted.
    pub const WEIGHT_DECAY: f64 = 0.0;

    /// `gamma` for `step` and `multistep` schedulers when omitted.
    pub const STEP_GAMMA: f64 = 0.1;

    /// `eta_min` for the `cosine` scheduler when omitted.
    pub const COSINE_ETA_MIN: f64 = 0.0;
}

// ============================================================================
// Closed Choices
// ============================================================================

/// A field whose value must come from a fixed, exhaustive set of names.
///
/// Parsing from strings only happens at load time through [`Choice::parse`];
/// everything downstream matches on the enum.
pub trait Choice: Copy + Sized + 'static {
    /// Every accepted variant, in documentation order.
    const VARIANTS: &'static [Self];

    /// Canonical configuration spelling of this variant.
    fn as_str(self) -> &'static str;

    /// Parses an exact (case-sensitive) configuration spelling.
    #[must_use]
    fn parse(value: &str) -> Option<Self> {
        Self::VARIANTS
            .iter()
            .copied()
            .find(|variant| variant.as_str() == value)
    }

    /// Returns the accepted spellings.
    #[must_use]
    fn allowed() -> Vec<&'static str> {
        Self::VARIANTS.iter().map(|variant| variant.as_str()).collect()
    }
}

/// Image-classification architecture to train.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ModelName {
    /// VGG-16
    #[serde(rename = "VGG16")]
    Vgg16,
    /// ResNet-18
    #[serde(rename = "ResNet18")]
    ResNet18,
    /// Deep Layer Aggregation
    #[serde(rename = "DLA")]
    Dla,
    /// Wide ResNet, depth 28, widening factor 10
    #[serde(rename = "WRN_28_10")]
    Wrn28x10,
}

impl Choice for ModelName {
    const VARIANTS: &'static [Self] = &[Self::Vgg16, Self::ResNet18, Self::Dla, Self::Wrn28x10];

    fn as_str(self) -> &'static str {
        match self {
            Self::Vgg16 => "VGG16",
            Self::ResNet18 => "ResNet18",
            Self::Dla => "DLA",
            Self::Wrn28x10 => "WRN_28_10",
        }
    }
}

impl fmt::Display for ModelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Benchmark dataset to classify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DatasetName {
    /// CIFAR-10
    #[serde(rename = "CIFAR10")]
    Cifar10,
    /// CIFAR-100
    #[serde(rename = "CIFAR100")]
    Cifar100,
    /// Street View House Numbers
    #[serde(rename = "SVHN")]
    Svhn,
    /// MNIST handwritten digits
    #[serde(rename = "MNIST")]
    Mnist,
    /// Fashion-MNIST
    #[serde(rename = "FashionMNIST")]
    FashionMnist,
}

impl DatasetName {
    /// Number of target classes.
    #[must_use]
    pub const fn num_classes(self) -> usize {
        match self {
            Self::Cifar100 => 100,
            Self::Cifar10 | Self::Svhn | Self::Mnist | Self::FashionMnist => 10,
        }
    }

    /// Number of input image channels.
    #[must_use]
    pub const fn in_channels(self) -> usize {
        match self {
            Self::Cifar10 | Self::Cifar100 | Self::Svhn => 3,
            Self::Mnist | Self::FashionMnist => 1,
        }
    }
}

impl Choice for DatasetName {
    const VARIANTS: &'static [Self] = &[
        Self::Cifar10,
        Self::Cifar100,
        Self::Svhn,
        Self::Mnist,
        Self::FashionMnist,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Self::Cifar10 => "CIFAR10",
            Self::Cifar100 => "CIFAR100",
            Self::Svhn => "SVHN",
            Self::Mnist => "MNIST",
            Self::FashionMnist => "FashionMNIST",
        }
    }
}

impl fmt::Display for DatasetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optimization algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizerName {
    /// Stochastic gradient descent
    Sgd,
    /// SGD with Nesterov momentum
    NesterovSgd,
    /// RMSprop
    Rmsprop,
    /// Adagrad
    Adagrad,
    /// Adam
    Adam,
}

impl OptimizerName {
    /// Returns `true` if the optimizer reads the `momentum` hyperparameter.
    #[must_use]
    pub const fn uses_momentum(self) -> bool {
        matches!(self, Self::Sgd | Self::NesterovSgd | Self::Rmsprop)
    }
}

impl Choice for OptimizerName {
    const VARIANTS: &'static [Self] = &[
        Self::Sgd,
        Self::NesterovSgd,
        Self::Rmsprop,
        Self::Adagrad,
        Self::Adam,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Self::Sgd => "sgd",
            Self::NesterovSgd => "nesterov_sgd",
            Self::Rmsprop => "rmsprop",
            Self::Adagrad => "adagrad",
            Self::Adam => "adam",
        }
    }
}

impl fmt::Display for OptimizerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Learning-rate scheduler kind; the tag of [`SchedulerConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchedulerName {
    /// Fixed learning rate
    Constant,
    /// Decay by `gamma` every `step_size` epochs
    Step,
    /// Decay by `gamma` at each milestone epoch
    MultiStep,
    /// Decay by `gamma` every epoch
    Exponential,
    /// Cosine annealing
    Cosine,
}

impl Choice for SchedulerName {
    const VARIANTS: &'static [Self] = &[
        Self::Constant,
        Self::Step,
        Self::MultiStep,
        Self::Exponential,
        Self::Cosine,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Self::Constant => "constant",
            Self::Step => "step",
            Self::MultiStep => "multistep",
            Self::Exponential => "exponential",
            Self::Cosine => "cosine",
        }
    }
}

impl fmt::Display for SchedulerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Top-Level Configuration
// ============================================================================

/// Complete, validated parameter set for one training run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunConfig {
    /// Model selection
    pub model: ModelConfig,

    /// Dataset selection
    pub dataset: DatasetConfig,

    /// Manual random seed; `None` means the run is not reproducible
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Training hyperparameters
    pub training: TrainingConfig,
}

/// Model selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelConfig {
    /// Architecture name
    pub name: ModelName,
}

/// Dataset selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DatasetConfig {
    /// Dataset name
    pub name: DatasetName,
}

// ============================================================================
// Training
// ============================================================================

/// Training loop hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingConfig {
    /// Number of epochs to train for
    pub num_epochs: u32,

    /// Optimizer settings
    pub optimizer: OptimizerConfig,

    /// Learning-rate scheduler
    pub scheduler: SchedulerConfig,

    /// Mini-batch sizes
    pub batch_size: BatchSizeConfig,

    /// Checkpoint resumption
    pub resume: ResumeConfig,
}

impl TrainingConfig {
    /// Cosine annealing period, falling back to the full run length.
    ///
    /// Returns `None` for non-cosine schedulers.
    #[must_use]
    pub fn cosine_t_max(&self) -> Option<u32> {
        match &self.scheduler {
            SchedulerConfig::Cosine(kwargs) => Some(kwargs.t_max.unwrap_or(self.num_epochs)),
            _ => None,
        }
    }
}

/// Optimizer settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OptimizerConfig {
    /// Algorithm
    pub name: OptimizerName,

    /// Initial learning rate (> 0)
    pub learning_rate: f64,

    /// Momentum factor (>= 0), read by the SGD family and RMSprop
    pub momentum: f64,

    /// L2 penalty (>= 0)
    pub weight_decay: f64,
}

/// Mini-batch sizes for training and validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchSizeConfig {
    /// Training batch size
    pub train: u32,

    /// Validation batch size
    pub val: u32,
}

/// Checkpoint resumption settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResumeConfig {
    /// Whether to resume from a previous run
    pub from_checkpoint: bool,

    /// Run directory of the previous run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkpoint_dir: Option<PathBuf>,
}

impl Default for ResumeConfig {
    fn default() -> Self {
        Self {
            from_checkpoint: defaults::FROM_CHECKPOINT,
            checkpoint_dir: None,
        }
    }
}

// ============================================================================
// Scheduler
// ============================================================================

/// Learning-rate scheduler, tagged by `name` with per-variant `kwargs`.
///
/// A variant whose kwargs struct equals its `Default` corresponds to an
/// omitted (empty) `kwargs` mapping.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "name", content = "kwargs", rename_all = "lowercase")]
pub enum SchedulerConfig {
    /// Fixed learning rate; takes no arguments
    Constant,
    /// Step decay
    Step(StepKwargs),
    /// Multi-step decay
    MultiStep(MultiStepKwargs),
    /// Exponential decay
    Exponential(ExponentialKwargs),
    /// Cosine annealing
    Cosine(CosineKwargs),
}

impl SchedulerConfig {
    /// Returns the scheduler kind.
    #[must_use]
    pub const fn name(&self) -> SchedulerName {
        match self {
            Self::Constant => SchedulerName::Constant,
            Self::Step(_) => SchedulerName::Step,
            Self::MultiStep(_) => SchedulerName::MultiStep,
            Self::Exponential(_) => SchedulerName::Exponential,
            Self::Cosine(_) => SchedulerName::Cosine,
        }
    }
}

/// Arguments of the `step` scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StepKwargs {
    /// Epochs between decays
    pub step_size: u32,

    /// Multiplicative decay factor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gamma: Option<f64>,
}

impl StepKwargs {
    /// Decay factor with the default applied.
    #[must_use]
    pub fn gamma(&self) -> f64 {
        self.gamma.unwrap_or(defaults::STEP_GAMMA)
    }
}

/// Arguments of the `multistep` scheduler.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultiStepKwargs {
    /// Strictly increasing epochs at which to decay
    pub milestones: Vec<u32>,

    /// Multiplicative decay factor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gamma: Option<f64>,
}

impl MultiStepKwargs {
    /// Decay factor with the default applied.
    #[must_use]
    pub fn gamma(&self) -> f64 {
        self.gamma.unwrap_or(defaults::STEP_GAMMA)
    }
}

/// Arguments of the `exponential` scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExponentialKwargs {
    /// Per-epoch decay factor
    pub gamma: f64,
}

/// Arguments of the `cosine` scheduler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CosineKwargs {
    /// Annealing period in epochs; defaults to `num_epochs`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub t_max: Option<u32>,

    /// Minimum learning rate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eta_min: Option<f64>,
}

impl CosineKwargs {
    /// Minimum learning rate with the default applied.
    #[must_use]
    pub fn eta_min(&self) -> f64 {
        self.eta_min.unwrap_or(defaults::COSINE_ETA_MIN)
    }

    /// Returns `true` when no argument was supplied.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.t_max.is_none() && self.eta_min.is_none()
    }
}

// ============================================================================
// Tests
// ============================================================================
