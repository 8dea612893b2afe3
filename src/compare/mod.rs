//! Schema comparator
//!
//! Recursive structural equality between two schema trees. Mismatches
//! are collected, not short-circuited, so the resulting diff lists every
//! differing path. An unequal outcome is a normal result, never an
//! error; callers map it to a report or an HTTP status.
//!
//! Equality rules: primitives by kind; enums by name and ordered symbol
//! list (declared order is part of the contract); records by field name
//! set, order-independent, with recursive field comparison; arrays by
//! element; unions as unordered variant sets. Field defaults do not
//! affect structural equality of nodes but a changed default on an
//! otherwise equal field is reported.

use std::fmt;

use crate::schema::{DefaultValue, SchemaNode};

/// One reason two schema trees differ, located by dotted path.
#[derive(Debug, Clone, PartialEq)]
pub enum DiffReason {
    /// Field present in the left schema but missing from the right.
    RemovedField { path: String },
    /// Field present in the right schema but missing from the left.
    AddedField { path: String },
    /// Node kinds (or primitive kinds) differ; both sides reported.
    KindMismatch {
        path: String,
        left: String,
        right: String,
    },
    /// Enum name or symbol list differs.
    EnumMismatch {
        path: String,
        left: String,
        right: String,
    },
    /// Union variant sets differ.
    UnionMismatch { path: String },
    /// Field schemas are equal but declared defaults differ.
    DefaultChanged {
        path: String,
        left: String,
        right: String,
    },
}

impl DiffReason {
    pub fn path(&self) -> &str {
        match self {
            DiffReason::RemovedField { path }
            | DiffReason::AddedField { path }
            | DiffReason::KindMismatch { path, .. }
            | DiffReason::EnumMismatch { path, .. }
            | DiffReason::UnionMismatch { path }
            | DiffReason::DefaultChanged { path, .. } => path,
        }
    }
}

impl fmt::Display for DiffReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiffReason::RemovedField { path } => write!(f, "- {} (removed)", path),
            DiffReason::AddedField { path } => write!(f, "+ {} (added)", path),
            DiffReason::KindMismatch { path, left, right } => {
                write!(f, "* {} (type changed: {} -> {})", path, left, right)
            }
            DiffReason::EnumMismatch { path, left, right } => {
                write!(f, "* {} (enum changed: {} -> {})", path, left, right)
            }
            DiffReason::UnionMismatch { path } => {
                write!(f, "* {} (union variants differ)", path)
            }
            DiffReason::DefaultChanged { path, left, right } => {
                write!(f, "* {} (default changed: {} -> {})", path, left, right)
            }
        }
    }
}

/// Comparison result: equal, or every reason the trees differ.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaDiff {
    Equal,
    Unequal(Vec<DiffReason>),
}

impl SchemaDiff {
    pub fn is_equal(&self) -> bool {
        matches!(self, SchemaDiff::Equal)
    }

    pub fn reasons(&self) -> &[DiffReason] {
        match self {
            SchemaDiff::Equal => &[],
            SchemaDiff::Unequal(reasons) => reasons,
        }
    }
}

impl fmt::Display for SchemaDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaDiff::Equal => write!(f, "schemas are equal"),
            SchemaDiff::Unequal(reasons) => {
                writeln!(f, "schemas differ ({} reasons):", reasons.len())?;
                for reason in reasons {
                    writeln!(f, "  {}", reason)?;
                }
                Ok(())
            }
        }
    }
}

/// Compares two schema trees; `compare(x, x)` is always `Equal`.
pub fn compare(left: &SchemaNode, right: &SchemaNode) -> SchemaDiff {
    let mut reasons = Vec::new();
    compare_nodes(left, right, "$root", &mut reasons);
    if reasons.is_empty() {
        SchemaDiff::Equal
    } else {
        SchemaDiff::Unequal(reasons)
    }
}

fn compare_nodes(left: &SchemaNode, right: &SchemaNode, path: &str, out: &mut Vec<DiffReason>) {
    use SchemaNode::*;

    match (left, right) {
        (Null, Null) => {}
        (Primitive(a), Primitive(b)) => {
            if a != b {
                out.push(DiffReason::KindMismatch {
                    path: path.to_string(),
                    left: a.type_name().to_string(),
                    right: b.type_name().to_string(),
                });
            }
        }
        (
            Enum {
                name: an,
                symbols: asym,
            },
            Enum {
                name: bn,
                symbols: bsym,
            },
        ) => {
            if an != bn || asym != bsym {
                out.push(DiffReason::EnumMismatch {
                    path: path.to_string(),
                    left: format!("{}[{}]", an, asym.join(", ")),
                    right: format!("{}[{}]", bn, bsym.join(", ")),
                });
            }
        }
        (Record { fields: af, .. }, Record { fields: bf, .. }) => {
            compare_fields(af, bf, path, out);
        }
        (Array { element: ae }, Array { element: be }) => {
            compare_nodes(ae, be, &format!("{}[]", path), out);
        }
        (Union { variants: av }, Union { variants: bv }) => {
            // Unordered set comparison
            let covered = av.iter().all(|a| bv.iter().any(|b| nodes_equal(a, b)))
                && bv.iter().all(|b| av.iter().any(|a| nodes_equal(a, b)));
            if !covered {
                out.push(DiffReason::UnionMismatch {
                    path: path.to_string(),
                });
            }
        }
        (a, b) => {
            out.push(DiffReason::KindMismatch {
                path: path.to_string(),
                left: a.type_name().to_string(),
                right: b.type_name().to_string(),
            });
        }
    }
}

fn compare_fields(
    left: &[crate::schema::FieldDef],
    right: &[crate::schema::FieldDef],
    path: &str,
    out: &mut Vec<DiffReason>,
) {
    let field_path = |name: &str| {
        if path == "$root" {
            name.to_string()
        } else {
            format!("{}.{}", path, name)
        }
    };

    for a in left {
        match right.iter().find(|b| b.name == a.name) {
            None => out.push(DiffReason::RemovedField {
                path: field_path(&a.name),
            }),
            Some(b) => {
                let nested = field_path(&a.name);
                let before = out.len();
                compare_nodes(&a.schema, &b.schema, &nested, out);
                // Defaults only reported when the schemas themselves match
                if out.len() == before && a.default != b.default {
                    out.push(DiffReason::DefaultChanged {
                        path: nested,
                        left: render_default(&a.default),
                        right: render_default(&b.default),
                    });
                }
            }
        }
    }

    for b in right {
        if !left.iter().any(|a| a.name == b.name) {
            out.push(DiffReason::AddedField {
                path: field_path(&b.name),
            });
        }
    }
}

fn nodes_equal(a: &SchemaNode, b: &SchemaNode) -> bool {
    let mut reasons = Vec::new();
    compare_nodes(a, b, "$root", &mut reasons);
    reasons.is_empty()
}

fn render_default(default: &Option<DefaultValue>) -> String {
    match default {
        None => "<none>".to_string(),
        Some(DefaultValue::Null) => "null".to_string(),
        Some(DefaultValue::Value(v)) => v.to_string(),
    }
}
