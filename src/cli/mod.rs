//! Command-line interface
//!
//! Argument definitions and command handlers for the `trainconf` binary.

pub mod args;
pub mod commands;
