//! recordcast - schema-driven interactive record construction
//!
//! Builds fully-typed, schema-conformant records from line-oriented
//! console input, compares schema trees structurally, and hands
//! assembled records to a publish boundary.

pub mod builder;
pub mod cli;
pub mod compare;
pub mod http_server;
pub mod observability;
pub mod registry;
pub mod schema;
pub mod transport;
pub mod value;
