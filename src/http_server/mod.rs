//! HTTP status surface
//!
//! Read-only endpoints reporting liveness and whether the local schema
//! matches the registry's latest version for the configured subject.

mod config;
mod server;
mod status_routes;

pub use config::HttpServerConfig;
pub use server::HttpServer;
pub use status_routes::{status_routes, StatusState};
