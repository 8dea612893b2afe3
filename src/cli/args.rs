//! CLI argument definitions using clap
//!
//! Commands:
//! - recordcast produce --config <path>
//! - recordcast compare <left.avsc> <right.avsc>
//! - recordcast register --config <path> <schema.avsc>
//! - recordcast status --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// recordcast - schema-driven interactive record construction
#[derive(Parser, Debug)]
#[command(name = "recordcast")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Interactively build records against the subject's schema and
    /// publish them
    Produce {
        /// Path to configuration file
        #[arg(long, default_value = "./recordcast.json")]
        config: PathBuf,
    },

    /// Compare two schema documents and print the structural diff
    Compare {
        /// Left (baseline) schema document
        left: PathBuf,
        /// Right (candidate) schema document
        right: PathBuf,
    },

    /// Register a schema document as the subject's next version
    Register {
        /// Path to configuration file
        #[arg(long, default_value = "./recordcast.json")]
        config: PathBuf,
        /// Schema document to register
        schema: PathBuf,
    },

    /// Serve the HTTP schema-status surface
    Status {
        /// Path to configuration file
        #[arg(long, default_value = "./recordcast.json")]
        config: PathBuf,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
