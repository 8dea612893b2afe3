//! Input coercion
//!
//! Converts one raw text token into a typed leaf value for a primitive or
//! enum schema. Empty tokens resolve through the field's default policy.
//! Arrays and records never reach this module; the session dispatches
//! them before coercion.

use crate::schema::{DefaultPolicy, PrimitiveKind, ResolvedField, SchemaError, SchemaNode};
use crate::value::Datum;

use super::errors::{BuildError, BuildResult};

/// Accepted spellings for boolean input, matched case-insensitively.
const TRUE_SPELLINGS: &[&str] = &["true", "yes", "y", "1", "sí", "si"];
const FALSE_SPELLINGS: &[&str] = &["false", "no", "n", "0"];

/// Coerces one trimmed input token against a resolved leaf field.
///
/// `path` is the dotted field path, used only in error messages.
pub fn coerce(token: &str, resolved: &ResolvedField<'_>, path: &str) -> BuildResult<Datum> {
    if token.is_empty() {
        return resolve_empty(resolved, path);
    }

    match resolved.effective {
        SchemaNode::Primitive(kind) => coerce_primitive(token, *kind, path),
        SchemaNode::Enum { symbols, .. } => {
            if symbols.iter().any(|s| s == token) {
                Ok(Datum::Symbol(token.to_string()))
            } else {
                Err(BuildError::unknown_enum_value(path, symbols))
            }
        }
        other => Err(SchemaError::malformed(format!(
            "non-leaf type {} reached the coercer at '{}'",
            other.type_name(),
            path
        ))
        .into()),
    }
}

/// Empty token: declared default first, then null for nullable fields,
/// otherwise the field is required and the caller re-prompts.
fn resolve_empty(resolved: &ResolvedField<'_>, path: &str) -> BuildResult<Datum> {
    match &resolved.default {
        DefaultPolicy::Value(value) => Ok(value.clone()),
        DefaultPolicy::ExplicitNull => Ok(Datum::Null),
        DefaultPolicy::None if resolved.nullable => Ok(Datum::Null),
        DefaultPolicy::None => Err(BuildError::missing_required(path)),
    }
}

fn coerce_primitive(token: &str, kind: PrimitiveKind, path: &str) -> BuildResult<Datum> {
    let invalid = |detail: String| BuildError::invalid_input(path, detail);
    match kind {
        PrimitiveKind::String => Ok(Datum::Str(token.to_string())),
        PrimitiveKind::Int => token
            .parse::<i32>()
            .map(Datum::Int)
            .map_err(|e| invalid(format!("expected int: {}", e))),
        PrimitiveKind::Long => token
            .parse::<i64>()
            .map(Datum::Long)
            .map_err(|e| invalid(format!("expected long: {}", e))),
        PrimitiveKind::Float => token
            .parse::<f32>()
            .map(Datum::Float)
            .map_err(|e| invalid(format!("expected float: {}", e))),
        PrimitiveKind::Double => token
            .parse::<f64>()
            .map(Datum::Double)
            .map_err(|e| invalid(format!("expected double: {}", e))),
        PrimitiveKind::Boolean => {
            let lower = token.to_lowercase();
            if TRUE_SPELLINGS.contains(&lower.as_str()) {
                Ok(Datum::Boolean(true))
            } else if FALSE_SPELLINGS.contains(&lower.as_str()) {
                Ok(Datum::Boolean(false))
            } else {
                Err(invalid(format!("'{}' is not a boolean", token)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{resolve, FieldDef};
    use serde_json::json;

    fn plain(kind: PrimitiveKind) -> ResolvedField<'static> {
        // Leak is confined to tests; keeps fixtures terse.
        let schema = Box::leak(Box::new(SchemaNode::Primitive(kind)));
        ResolvedField {
            effective: schema,
            nullable: false,
            default: DefaultPolicy::None,
        }
    }

    #[test]
    fn test_primitive_round_trip() {
        assert_eq!(
            coerce("1001", &plain(PrimitiveKind::Int), "orderId").unwrap(),
            Datum::Int(1001)
        );
        assert_eq!(
            coerce("-7", &plain(PrimitiveKind::Long), "n").unwrap(),
            Datum::Long(-7)
        );
        assert_eq!(
            coerce("9.99", &plain(PrimitiveKind::Float), "price").unwrap(),
            Datum::Float(9.99)
        );
        assert_eq!(
            coerce("29.97", &plain(PrimitiveKind::Double), "total").unwrap(),
            Datum::Double(29.97)
        );
        assert_eq!(
            coerce("Ana", &plain(PrimitiveKind::String), "name").unwrap(),
            Datum::Str("Ana".into())
        );
    }

    #[test]
    fn test_numeric_parse_failure_is_invalid_input() {
        let err = coerce("abc", &plain(PrimitiveKind::Int), "orderId").unwrap_err();
        assert_eq!(err.code(), "CAST_INVALID_INPUT");
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_boolean_spellings() {
        for token in ["true", "YES", "y", "1", "sí", "Si"] {
            assert_eq!(
                coerce(token, &plain(PrimitiveKind::Boolean), "ok").unwrap(),
                Datum::Boolean(true),
                "token {:?}",
                token
            );
        }
        for token in ["false", "No", "n", "0"] {
            assert_eq!(
                coerce(token, &plain(PrimitiveKind::Boolean), "ok").unwrap(),
                Datum::Boolean(false),
                "token {:?}",
                token
            );
        }
        assert!(coerce("maybe", &plain(PrimitiveKind::Boolean), "ok").is_err());
    }

    #[test]
    fn test_enum_exact_match_only() {
        let schema = SchemaNode::Enum {
            name: "Status".into(),
            symbols: vec!["PENDING".into(), "SHIPPED".into()],
        };
        let resolved = ResolvedField {
            effective: &schema,
            nullable: false,
            default: DefaultPolicy::None,
        };

        assert_eq!(
            coerce("SHIPPED", &resolved, "status").unwrap(),
            Datum::Symbol("SHIPPED".into())
        );

        // Case variants not declared are rejected
        let err = coerce("shipped", &resolved, "status").unwrap_err();
        assert_eq!(err.code(), "CAST_UNKNOWN_ENUM_VALUE");
        assert!(err.to_string().contains("PENDING"));
    }

    #[test]
    fn test_empty_token_with_value_default() {
        let field = FieldDef::with_default(
            "quantity",
            SchemaNode::Primitive(PrimitiveKind::Int),
            json!(1),
        );
        let resolved = resolve(&field).unwrap();
        assert_eq!(coerce("", &resolved, "quantity").unwrap(), Datum::Int(1));
    }

    #[test]
    fn test_empty_token_nullable_yields_null() {
        let field = FieldDef::nullable("note", SchemaNode::Primitive(PrimitiveKind::String));
        let resolved = resolve(&field).unwrap();
        assert_eq!(coerce("", &resolved, "note").unwrap(), Datum::Null);
    }

    #[test]
    fn test_empty_token_required_rejected() {
        let err = coerce("", &plain(PrimitiveKind::String), "name").unwrap_err();
        assert_eq!(err.code(), "CAST_MISSING_REQUIRED_FIELD");
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_non_leaf_is_fatal() {
        let schema = SchemaNode::Array {
            element: Box::new(SchemaNode::Primitive(PrimitiveKind::Int)),
        };
        let resolved = ResolvedField {
            effective: &schema,
            nullable: false,
            default: DefaultPolicy::None,
        };
        let err = coerce("x", &resolved, "items").unwrap_err();
        assert!(!err.is_recoverable());
    }
}
