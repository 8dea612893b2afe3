//! Schema model
//!
//! Immutable schema trees, document parsing, and field resolution.
//! Trees are created once per load or registry lookup and read-only
//! afterward; the record builder and the comparator share them freely.

mod errors;
mod parser;
mod resolver;
mod types;

pub use errors::{SchemaError, SchemaResult};
pub use parser::{parse_document, parse_value};
pub use resolver::{effective_schema, resolve, DefaultPolicy, ResolvedField};
pub use types::{DefaultValue, FieldDef, PrimitiveKind, SchemaKind, SchemaNode};
