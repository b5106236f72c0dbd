//! CLI module for the MemoryDB resource provider.
//!
//! This module provides the command-line interface for running handler
//! invocations against local JSON payloads.

mod commands;
mod output;
mod payload;

pub use commands::{Cli, Commands, OutputFormat};
pub use output::OutputFormatter;
pub use payload::{load_json, load_request};
