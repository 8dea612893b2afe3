//! Field resolver
//!
//! Computes a field's effective (non-null) schema, nullability, and
//! default policy. A field is nullable iff its schema is a union
//! containing a null variant; its effective schema is then the union's
//! sole non-null variant. Unions with more than one non-null variant are
//! rejected here, not approximated.

use serde_json::Value;

use crate::value::Datum;

use super::errors::{SchemaError, SchemaResult};
use super::types::{DefaultValue, FieldDef, PrimitiveKind, SchemaNode};

/// How an empty input token resolves for a field.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultPolicy {
    /// No declared default: empty input on a non-nullable field is an error.
    None,
    /// Declared `"default": null`: empty input yields null.
    ExplicitNull,
    /// Declared value default, already converted to the effective schema's
    /// native representation.
    Value(Datum),
}

/// Resolution result for one field.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedField<'a> {
    pub effective: &'a SchemaNode,
    pub nullable: bool,
    pub default: DefaultPolicy,
}

/// Unwraps a possibly-union schema to its effective non-null node.
///
/// Array elements go through this too; they carry no field declaration
/// of their own. `path` names the location in errors.
pub fn effective_schema<'a>(
    schema: &'a SchemaNode,
    path: &str,
) -> SchemaResult<(&'a SchemaNode, bool)> {
    match schema {
        SchemaNode::Union { variants } => {
            let nullable = variants.iter().any(|v| matches!(v, SchemaNode::Null));
            let non_null: Vec<&SchemaNode> = variants
                .iter()
                .filter(|v| !matches!(v, SchemaNode::Null))
                .collect();
            match non_null.as_slice() {
                [single] => Ok((*single, nullable)),
                [] => Err(SchemaError::unsupported_union(
                    path,
                    "union has no non-null variant",
                )),
                more => Err(SchemaError::unsupported_union(
                    path,
                    format!("{} non-null variants", more.len()),
                )),
            }
        }
        other => Ok((other, false)),
    }
}

/// Resolves a field's effective schema, nullability, and default.
pub fn resolve(field: &FieldDef) -> SchemaResult<ResolvedField<'_>> {
    let (effective, nullable) = effective_schema(&field.schema, &field.name)?;

    let default = match &field.default {
        None => DefaultPolicy::None,
        Some(DefaultValue::Null) => DefaultPolicy::ExplicitNull,
        Some(DefaultValue::Value(value)) => {
            DefaultPolicy::Value(convert_default(&field.name, value, effective)?)
        }
    };

    Ok(ResolvedField {
        effective,
        nullable,
        default,
    })
}

/// Converts a declared default into the effective schema's representation.
fn convert_default(field: &str, value: &Value, schema: &SchemaNode) -> SchemaResult<Datum> {
    let mismatch = || {
        SchemaError::malformed(format!(
            "default {} for field '{}' does not fit type {}",
            value,
            field,
            schema.type_name()
        ))
    };

    match schema {
        SchemaNode::Primitive(kind) => match kind {
            PrimitiveKind::Boolean => value.as_bool().map(Datum::Boolean).ok_or_else(mismatch),
            PrimitiveKind::Int => value
                .as_i64()
                .and_then(|n| i32::try_from(n).ok())
                .map(Datum::Int)
                .ok_or_else(mismatch),
            PrimitiveKind::Long => value.as_i64().map(Datum::Long).ok_or_else(mismatch),
            PrimitiveKind::Float => value
                .as_f64()
                .map(|n| Datum::Float(n as f32))
                .ok_or_else(mismatch),
            PrimitiveKind::Double => value.as_f64().map(Datum::Double).ok_or_else(mismatch),
            PrimitiveKind::String => value
                .as_str()
                .map(|s| Datum::Str(s.to_string()))
                .ok_or_else(mismatch),
        },
        SchemaNode::Enum { symbols, .. } => {
            let symbol = value.as_str().ok_or_else(mismatch)?;
            if symbols.iter().any(|s| s == symbol) {
                Ok(Datum::Symbol(symbol.to_string()))
            } else {
                Err(SchemaError::malformed(format!(
                    "default '{}' for field '{}' is not a declared symbol",
                    symbol, field
                )))
            }
        }
        // Record/array defaults never occur in the supported documents.
        _ => Err(SchemaError::malformed(format!(
            "default for composite field '{}' is not supported",
            field
        ))),
    }
}
