//! Schema error types
//!
//! Error codes:
//! - CAST_MALFORMED_SCHEMA (fatal for the current build)
//! - CAST_UNSUPPORTED_UNION_SHAPE (fatal for the current build)
//! - CAST_SCHEMA_NOT_FOUND (fatal for the lookup request)
//!
//! Structural errors are never absorbed at the field boundary: they abort
//! the whole record construction so no partial object is ever published.

use thiserror::Error;

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors raised while loading, resolving, or walking a schema tree.
#[derive(Debug, Clone, Error)]
pub enum SchemaError {
    /// A node violates shape invariants (empty union, union-in-union,
    /// enum without symbols, duplicate field names, unparseable document,
    /// or a declared default that does not fit its field's type).
    #[error("Malformed schema: {detail}")]
    Malformed { detail: String },

    /// A union with more than one non-null variant, or with no non-null
    /// variant at all. Richer unions are rejected rather than guessed at.
    #[error("Unsupported union shape at '{path}': {detail}")]
    UnsupportedUnionShape { path: String, detail: String },

    /// Subject has no schema in the registry.
    #[error("Schema for subject '{subject}' not found")]
    NotFound { subject: String },
}

impl SchemaError {
    pub fn malformed(detail: impl Into<String>) -> Self {
        SchemaError::Malformed {
            detail: detail.into(),
        }
    }

    pub fn unsupported_union(path: impl Into<String>, detail: impl Into<String>) -> Self {
        SchemaError::UnsupportedUnionShape {
            path: path.into(),
            detail: detail.into(),
        }
    }

    pub fn not_found(subject: impl Into<String>) -> Self {
        SchemaError::NotFound {
            subject: subject.into(),
        }
    }

    /// Stable error code string, used in logs and HTTP bodies.
    pub fn code(&self) -> &'static str {
        match self {
            SchemaError::Malformed { .. } => "CAST_MALFORMED_SCHEMA",
            SchemaError::UnsupportedUnionShape { .. } => "CAST_UNSUPPORTED_UNION_SHAPE",
            SchemaError::NotFound { .. } => "CAST_SCHEMA_NOT_FOUND",
        }
    }
}
