//! Configuration module
//!
//! Loads and validates training run configuration files: model and dataset
//! selection, seed, optimizer, scheduler, batch sizes and resumption.

pub mod document;
pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{ConfigLoader, LoadResult, LoadWarning, LoaderOptions};
pub use schema::*;
pub use validation::{ValidationResult, Validator};
