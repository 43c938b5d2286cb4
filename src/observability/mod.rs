//! Observability module
//!
//! Structured logging for configuration loading and run preparation.

pub mod logging;

pub use logging::{LogFormat, init_logging, verbosity_to_directive};
