//! Schema tree model
//!
//! Supported node kinds:
//! - null (only meaningful inside unions)
//! - primitives: boolean, int (32-bit), long (64-bit), float (32-bit),
//!   double (64-bit), string
//! - enum: named, ordered symbol list
//! - record: named, ordered field list
//! - array: homogeneous element type
//! - union: ordered variant list (only null + one non-null is buildable)
//!
//! Trees are immutable once constructed and shared read-only by the
//! record builder and the comparator.

use serde::{Deserialize, Serialize};

use super::errors::{SchemaError, SchemaResult};

/// Primitive leaf kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    Boolean,
    /// 32-bit signed integer
    Int,
    /// 64-bit signed integer
    Long,
    /// 32-bit floating point
    Float,
    /// 64-bit floating point
    Double,
    String,
}

impl PrimitiveKind {
    /// Returns the type name used in prompts and diffs.
    pub fn type_name(&self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Long => "long",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
            PrimitiveKind::String => "string",
        }
    }

    /// Parses a primitive type name as it appears in schema documents.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "boolean" => Some(PrimitiveKind::Boolean),
            "int" => Some(PrimitiveKind::Int),
            "long" => Some(PrimitiveKind::Long),
            "float" => Some(PrimitiveKind::Float),
            "double" => Some(PrimitiveKind::Double),
            "string" => Some(PrimitiveKind::String),
            _ => None,
        }
    }
}

/// Coarse classification of a schema node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    Null,
    Primitive,
    Enum,
    Record,
    Array,
    Union,
}

/// One node of a schema tree.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    Null,
    Primitive(PrimitiveKind),
    Enum {
        name: String,
        /// Declared symbol order is part of the contract.
        symbols: Vec<String>,
    },
    Record {
        name: String,
        fields: Vec<FieldDef>,
    },
    Array {
        element: Box<SchemaNode>,
    },
    Union {
        variants: Vec<SchemaNode>,
    },
}

impl SchemaNode {
    /// Classifies this node.
    pub fn kind(&self) -> SchemaKind {
        match self {
            SchemaNode::Null => SchemaKind::Null,
            SchemaNode::Primitive(_) => SchemaKind::Primitive,
            SchemaNode::Enum { .. } => SchemaKind::Enum,
            SchemaNode::Record { .. } => SchemaKind::Record,
            SchemaNode::Array { .. } => SchemaKind::Array,
            SchemaNode::Union { .. } => SchemaKind::Union,
        }
    }

    /// Returns the type name used in prompts and diffs.
    pub fn type_name(&self) -> &'static str {
        match self {
            SchemaNode::Null => "null",
            SchemaNode::Primitive(kind) => kind.type_name(),
            SchemaNode::Enum { .. } => "enum",
            SchemaNode::Record { .. } => "record",
            SchemaNode::Array { .. } => "array",
            SchemaNode::Union { .. } => "union",
        }
    }

    /// Ordered field list of a record node.
    pub fn fields(&self) -> Option<&[FieldDef]> {
        match self {
            SchemaNode::Record { fields, .. } => Some(fields),
            _ => None,
        }
    }

    /// Element schema of an array node.
    pub fn element(&self) -> Option<&SchemaNode> {
        match self {
            SchemaNode::Array { element } => Some(element),
            _ => None,
        }
    }

    /// Ordered variant list of a union node.
    pub fn variants(&self) -> Option<&[SchemaNode]> {
        match self {
            SchemaNode::Union { variants } => Some(variants),
            _ => None,
        }
    }

    /// True for primitive and enum nodes (no further recursion).
    pub fn is_leaf(&self) -> bool {
        matches!(self, SchemaNode::Primitive(_) | SchemaNode::Enum { .. })
    }

    /// Validates shape invariants over the whole tree.
    ///
    /// Rejects empty unions, unions nested directly in unions, enums
    /// without symbols or with duplicate symbols, and records with
    /// duplicate field names.
    pub fn validate_shape(&self) -> SchemaResult<()> {
        self.validate_at("$")
    }

    fn validate_at(&self, path: &str) -> SchemaResult<()> {
        match self {
            SchemaNode::Null | SchemaNode::Primitive(_) => Ok(()),
            SchemaNode::Enum { name, symbols } => {
                if symbols.is_empty() {
                    return Err(SchemaError::malformed(format!(
                        "enum '{}' at {} has no symbols",
                        name, path
                    )));
                }
                for (i, symbol) in symbols.iter().enumerate() {
                    if symbols[..i].contains(symbol) {
                        return Err(SchemaError::malformed(format!(
                            "enum '{}' at {} declares symbol '{}' twice",
                            name, path, symbol
                        )));
                    }
                }
                Ok(())
            }
            SchemaNode::Record { name, fields } => {
                for (i, field) in fields.iter().enumerate() {
                    if fields[..i].iter().any(|f| f.name == field.name) {
                        return Err(SchemaError::malformed(format!(
                            "record '{}' at {} declares field '{}' twice",
                            name, path, field.name
                        )));
                    }
                    let field_path = format!("{}.{}", path, field.name);
                    field.schema.validate_at(&field_path)?;
                }
                Ok(())
            }
            SchemaNode::Array { element } => element.validate_at(&format!("{}[]", path)),
            SchemaNode::Union { variants } => {
                if variants.is_empty() {
                    return Err(SchemaError::malformed(format!("empty union at {}", path)));
                }
                for variant in variants {
                    if matches!(variant, SchemaNode::Union { .. }) {
                        return Err(SchemaError::malformed(format!(
                            "union nested directly in union at {}",
                            path
                        )));
                    }
                    variant.validate_at(path)?;
                }
                Ok(())
            }
        }
    }
}

/// Declared default for a field.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    /// Explicit `"default": null`
    Null,
    /// Any other declared default, kept in document form until resolution
    Value(serde_json::Value),
}

/// One named field of a record schema.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    pub name: String,
    pub schema: SchemaNode,
    pub default: Option<DefaultValue>,
}

impl FieldDef {
    /// A required field with no default.
    pub fn required(name: impl Into<String>, schema: SchemaNode) -> Self {
        Self {
            name: name.into(),
            schema,
            default: None,
        }
    }

    /// A nullable field (union of null and the given schema).
    pub fn nullable(name: impl Into<String>, schema: SchemaNode) -> Self {
        Self {
            name: name.into(),
            schema: SchemaNode::Union {
                variants: vec![SchemaNode::Null, schema],
            },
            default: None,
        }
    }

    /// A field with a declared default value.
    pub fn with_default(
        name: impl Into<String>,
        schema: SchemaNode,
        default: serde_json::Value,
    ) -> Self {
        let default = if default.is_null() {
            DefaultValue::Null
        } else {
            DefaultValue::Value(default)
        };
        Self {
            name: name.into(),
            schema,
            default: Some(default),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order_item() -> SchemaNode {
        SchemaNode::Record {
            name: "Item".into(),
            fields: vec![
                FieldDef::required("productId", SchemaNode::Primitive(PrimitiveKind::Int)),
                FieldDef::required("price", SchemaNode::Primitive(PrimitiveKind::Float)),
            ],
        }
    }

    #[test]
    fn test_kind_classification() {
        assert_eq!(SchemaNode::Null.kind(), SchemaKind::Null);
        assert_eq!(
            SchemaNode::Primitive(PrimitiveKind::Long).kind(),
            SchemaKind::Primitive
        );
        assert_eq!(order_item().kind(), SchemaKind::Record);
        assert_eq!(
            SchemaNode::Array {
                element: Box::new(order_item())
            }
            .kind(),
            SchemaKind::Array
        );
    }

    #[test]
    fn test_primitive_names_round_trip() {
        for name in ["boolean", "int", "long", "float", "double", "string"] {
            let kind = PrimitiveKind::from_name(name).unwrap();
            assert_eq!(kind.type_name(), name);
        }
        assert!(PrimitiveKind::from_name("bytes").is_none());
    }

    #[test]
    fn test_well_formed_tree_validates() {
        let schema = SchemaNode::Record {
            name: "Order".into(),
            fields: vec![
                FieldDef::required("orderId", SchemaNode::Primitive(PrimitiveKind::Int)),
                FieldDef::required(
                    "items",
                    SchemaNode::Array {
                        element: Box::new(order_item()),
                    },
                ),
                FieldDef::nullable("note", SchemaNode::Primitive(PrimitiveKind::String)),
            ],
        };
        assert!(schema.validate_shape().is_ok());
    }

    #[test]
    fn test_empty_union_rejected() {
        let schema = SchemaNode::Record {
            name: "Bad".into(),
            fields: vec![FieldDef::required(
                "x",
                SchemaNode::Union { variants: vec![] },
            )],
        };
        let err = schema.validate_shape().unwrap_err();
        assert_eq!(err.code(), "CAST_MALFORMED_SCHEMA");
        assert!(err.to_string().contains("empty union"));
    }

    #[test]
    fn test_nested_union_rejected() {
        let schema = SchemaNode::Union {
            variants: vec![SchemaNode::Union {
                variants: vec![SchemaNode::Null],
            }],
        };
        assert!(schema.validate_shape().is_err());
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let schema = SchemaNode::Record {
            name: "Bad".into(),
            fields: vec![
                FieldDef::required("x", SchemaNode::Primitive(PrimitiveKind::Int)),
                FieldDef::required("x", SchemaNode::Primitive(PrimitiveKind::String)),
            ],
        };
        let err = schema.validate_shape().unwrap_err();
        assert!(err.to_string().contains("'x' twice"));
    }

    #[test]
    fn test_enum_without_symbols_rejected() {
        let schema = SchemaNode::Enum {
            name: "Status".into(),
            symbols: vec![],
        };
        assert!(schema.validate_shape().is_err());
    }
}
