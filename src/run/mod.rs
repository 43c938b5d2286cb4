//! Run preparation
//!
//! Glue between a validated configuration and the training loop: the
//! per-run output directory and the resume checks.

pub mod directory;
pub mod resume;

pub use directory::{CHECKPOINT_FILE, CONFIG_SNAPSHOT, LOG_FILE, RunDirectory};
pub use resume::{ResumePoint, check_compatible, plan_resume};
