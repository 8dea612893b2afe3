//! CLI module
//!
//! Commands:
//! - produce: interactive session loop, builds and publishes records
//! - compare: one-shot structural diff of two schema documents
//! - register: add a schema document as a subject's next version
//! - status: serve the HTTP schema-status surface

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{compare_files, produce, register, run, run_command, status, Config, SESSION_SENTINEL};
pub use errors::{CliError, CliResult};
pub use io::{write_report, ConsolePrompter};
