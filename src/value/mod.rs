//! Typed value domain for assembled records
//!
//! A `Datum` is the coerced, schema-conformant counterpart of raw console
//! input. Leaves are produced by the input coercer; records and arrays are
//! produced by the assembly pass. The distinction between 32- and 64-bit
//! numerics is kept so a value always matches its schema's primitive kind.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Number, Value};

/// A fully-typed value conforming to some schema node.
#[derive(Debug, Clone, PartialEq)]
pub enum Datum {
    /// Null (only valid for nullable fields)
    Null,
    Boolean(bool),
    /// 32-bit signed integer
    Int(i32),
    /// 64-bit signed integer
    Long(i64),
    /// 32-bit float
    Float(f32),
    /// 64-bit float
    Double(f64),
    Str(String),
    /// A declared enum symbol
    Symbol(String),
    /// Nested record, field order preserved
    Record(Vec<(String, Datum)>),
    Array(Vec<Datum>),
}

impl Datum {
    /// Type name used in prompts and error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Datum::Null => "null",
            Datum::Boolean(_) => "boolean",
            Datum::Int(_) => "int",
            Datum::Long(_) => "long",
            Datum::Float(_) => "float",
            Datum::Double(_) => "double",
            Datum::Str(_) => "string",
            Datum::Symbol(_) => "enum",
            Datum::Record(_) => "record",
            Datum::Array(_) => "array",
        }
    }

    /// Renders the datum as a plain string for use as a publish key.
    ///
    /// Scalars render as their display form; composites fall back to JSON.
    pub fn render_key(&self) -> String {
        match self {
            Datum::Null => "null".to_string(),
            Datum::Boolean(b) => b.to_string(),
            Datum::Int(n) => n.to_string(),
            Datum::Long(n) => n.to_string(),
            Datum::Float(n) => n.to_string(),
            Datum::Double(n) => n.to_string(),
            Datum::Str(s) | Datum::Symbol(s) => s.clone(),
            other => other.to_json().to_string(),
        }
    }

    /// Converts the datum into a JSON value for the transport handoff.
    pub fn to_json(&self) -> Value {
        match self {
            Datum::Null => Value::Null,
            Datum::Boolean(b) => Value::Bool(*b),
            Datum::Int(n) => Value::Number((*n).into()),
            Datum::Long(n) => Value::Number((*n).into()),
            Datum::Float(n) => Number::from_f64(f64::from(*n))
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Datum::Double(n) => Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Datum::Str(s) | Datum::Symbol(s) => Value::String(s.clone()),
            Datum::Record(fields) => {
                let mut map = serde_json::Map::new();
                for (name, value) in fields {
                    map.insert(name.clone(), value.to_json());
                }
                Value::Object(map)
            }
            Datum::Array(items) => Value::Array(items.iter().map(Datum::to_json).collect()),
        }
    }

    /// Looks up a top-level field of a record datum.
    pub fn field(&self, name: &str) -> Option<&Datum> {
        match self {
            Datum::Record(fields) => fields.iter().find(|(n, _)| n == name).map(|(_, v)| v),
            _ => None,
        }
    }
}

impl fmt::Display for Datum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Datum::Str(s) | Datum::Symbol(s) => write!(f, "{}", s),
            other => write!(f, "{}", other.to_json()),
        }
    }
}

/// Sorted-key view of a record datum, for deterministic test assertions.
pub fn record_as_map(datum: &Datum) -> Option<BTreeMap<&str, &Datum>> {
    match datum {
        Datum::Record(fields) => Some(fields.iter().map(|(n, v)| (n.as_str(), v)).collect()),
        _ => None,
    }
}
