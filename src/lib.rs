//! `trainconf` - run configuration for image-classification training
//!
//! This library loads and validates the YAML file that parameterizes a
//! training run, and prepares the run directory and resume point the
//! training loop starts from.

pub mod cli;
pub mod config;
pub mod error;
pub mod observability;
pub mod run;
