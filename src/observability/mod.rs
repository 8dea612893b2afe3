//! Observability
//!
//! Structured logging for the CLI and the HTTP surface.

mod logger;

pub use logger::{Logger, Severity};
