//! CLI command definitions.
//!
//! This module defines all CLI commands and their arguments using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::handler::{Action, ResourceKind};

/// MemoryDB resource provider - CRUDL handlers for MemoryDB sub-resources.
#[derive(Parser, Debug)]
#[command(name = "memorydb-provider")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a single handler invocation and print the progress event.
    Invoke {
        /// Resource type to operate on.
        #[arg(value_enum)]
        resource: ResourceKind,

        /// Handler action to run.
        #[arg(value_enum)]
        action: Action,

        /// Path to the request payload (JSON).
        #[arg(short, long)]
        request: PathBuf,

        /// Path to a callback context emitted by a prior invocation.
        #[arg(short, long)]
        context: Option<PathBuf>,
    },

    /// Re-invoke the handler until the operation reaches a terminal event,
    /// honoring the callback delay between invocations.
    Run {
        /// Resource type to operate on.
        #[arg(value_enum)]
        resource: ResourceKind,

        /// Handler action to run.
        #[arg(value_enum)]
        action: Action,

        /// Path to the request payload (JSON).
        #[arg(short, long)]
        request: PathBuf,

        /// Maximum invocations before giving up.
        #[arg(long, default_value = "150")]
        max_invocations: u32,
    },
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
