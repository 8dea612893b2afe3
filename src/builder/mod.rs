//! Record builder
//!
//! Turns a record schema plus a source of raw input lines into a typed,
//! schema-conformant object graph: recursive descent with per-field
//! coercion, flat accumulation into a dotted-path store, then structural
//! reassembly.

mod assemble;
mod coerce;
mod errors;
mod session;
mod store;

pub use assemble::assemble;
pub use coerce::coerce;
pub use errors::{BuildError, BuildResult};
pub use session::{BuildSession, Prompter, ScriptedPrompter, SessionState, ARRAY_SENTINEL};
pub use store::{join_path, FlattenedStore, StoreEntry};
