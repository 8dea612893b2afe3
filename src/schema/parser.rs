//! Schema document parser
//!
//! Parses Avro-style JSON schema documents into `SchemaNode` trees:
//! type-name strings ("int", "string", ...), `{"type": "record", ...}` /
//! `{"type": "enum", ...}` / `{"type": "array", ...}` objects, and
//! JSON arrays for unions. `namespace`, `doc`, and `aliases` attributes
//! are accepted and ignored. Named-type back references are not
//! supported; every nested type must be declared inline.

use serde_json::Value;

use super::errors::{SchemaError, SchemaResult};
use super::types::{DefaultValue, FieldDef, PrimitiveKind, SchemaNode};

/// Parses a schema document and validates its shape.
pub fn parse_document(text: &str) -> SchemaResult<SchemaNode> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| SchemaError::malformed(format!("invalid JSON: {}", e)))?;
    let schema = parse_value(&value)?;
    schema.validate_shape()?;
    Ok(schema)
}

/// Parses one schema node from its JSON form.
pub fn parse_value(value: &Value) -> SchemaResult<SchemaNode> {
    match value {
        Value::String(name) => parse_type_name(name),
        Value::Array(variants) => {
            let variants = variants.iter().map(parse_value).collect::<SchemaResult<_>>()?;
            Ok(SchemaNode::Union { variants })
        }
        Value::Object(obj) => {
            let type_name = obj
                .get("type")
                .and_then(Value::as_str)
                .ok_or_else(|| SchemaError::malformed("object schema without 'type'"))?;
            match type_name {
                "record" => parse_record(obj),
                "enum" => parse_enum(obj),
                "array" => {
                    let items = obj
                        .get("items")
                        .ok_or_else(|| SchemaError::malformed("array without element type"))?;
                    Ok(SchemaNode::Array {
                        element: Box::new(parse_value(items)?),
                    })
                }
                // {"type": "string"} object form of a primitive
                other => parse_type_name(other),
            }
        }
        other => Err(SchemaError::malformed(format!(
            "unexpected schema value: {}",
            other
        ))),
    }
}

fn parse_type_name(name: &str) -> SchemaResult<SchemaNode> {
    if name == "null" {
        return Ok(SchemaNode::Null);
    }
    PrimitiveKind::from_name(name)
        .map(SchemaNode::Primitive)
        .ok_or_else(|| SchemaError::malformed(format!("unknown type name '{}'", name)))
}

fn parse_record(obj: &serde_json::Map<String, Value>) -> SchemaResult<SchemaNode> {
    let name = required_str(obj, "name", "record")?;
    let fields = obj
        .get("fields")
        .and_then(Value::as_array)
        .ok_or_else(|| SchemaError::malformed(format!("record '{}' without fields list", name)))?;

    let fields = fields
        .iter()
        .map(|field| parse_field(field, name))
        .collect::<SchemaResult<Vec<_>>>()?;

    Ok(SchemaNode::Record {
        name: name.to_string(),
        fields,
    })
}

fn parse_field(value: &Value, record_name: &str) -> SchemaResult<FieldDef> {
    let obj = value.as_object().ok_or_else(|| {
        SchemaError::malformed(format!("field of record '{}' is not an object", record_name))
    })?;
    let name = required_str(obj, "name", "field")?;
    let schema = obj.get("type").ok_or_else(|| {
        SchemaError::malformed(format!("field '{}' without a type", name))
    })?;

    let default = obj.get("default").map(|d| {
        if d.is_null() {
            DefaultValue::Null
        } else {
            DefaultValue::Value(d.clone())
        }
    });

    Ok(FieldDef {
        name: name.to_string(),
        schema: parse_value(schema)?,
        default,
    })
}

fn parse_enum(obj: &serde_json::Map<String, Value>) -> SchemaResult<SchemaNode> {
    let name = required_str(obj, "name", "enum")?;
    let symbols = obj
        .get("symbols")
        .and_then(Value::as_array)
        .ok_or_else(|| SchemaError::malformed(format!("enum '{}' without symbols", name)))?;

    let symbols = symbols
        .iter()
        .map(|s| {
            s.as_str().map(str::to_string).ok_or_else(|| {
                SchemaError::malformed(format!("enum '{}' has a non-string symbol", name))
            })
        })
        .collect::<SchemaResult<Vec<_>>>()?;

    Ok(SchemaNode::Enum {
        name: name.to_string(),
        symbols,
    })
}

fn required_str<'a>(
    obj: &'a serde_json::Map<String, Value>,
    key: &str,
    context: &str,
) -> SchemaResult<&'a str> {
    obj.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| SchemaError::malformed(format!("{} without '{}'", context, key)))
}
