//! Object graph assembly
//!
//! Walks the top-level schema a second time and reconstructs the nested
//! record/array structure from the flattened store. Keeping assembly out
//! of the per-field prompt logic lets array items, which are collected
//! without the parent's path prefix, be reassembled independently.

use crate::schema::{effective_schema, resolve, SchemaError, SchemaNode, SchemaResult};
use crate::value::Datum;

use super::store::{join_path, FlattenedStore, StoreEntry};

/// Rebuilds the typed object graph for a record schema from its store.
///
/// Every required leaf path must be present; the builder writes each
/// path exactly once, so a missing path is a structural error, not a
/// user-input condition.
pub fn assemble(schema: &SchemaNode, store: &FlattenedStore) -> SchemaResult<Datum> {
    assemble_record(schema, store, "")
}

fn assemble_record(
    schema: &SchemaNode,
    store: &FlattenedStore,
    prefix: &str,
) -> SchemaResult<Datum> {
    let fields = schema
        .fields()
        .ok_or_else(|| SchemaError::malformed("expected a record node during assembly"))?;

    let mut assembled = Vec::with_capacity(fields.len());
    for field in fields {
        let path = join_path(prefix, &field.name);
        let resolved = resolve(field)?;

        let value = match resolved.effective {
            SchemaNode::Record { .. } => assemble_record(resolved.effective, store, &path)?,
            SchemaNode::Array { .. } => {
                let element = resolved
                    .effective
                    .element()
                    .ok_or_else(|| SchemaError::malformed("array node without element"))?;
                let (element, _) = effective_schema(element, &path)?;
                match store.get(&path) {
                    Some(StoreEntry::Items(items)) => {
                        let items = items
                            .iter()
                            .map(|item| assemble_item(element, item))
                            .collect::<SchemaResult<Vec<_>>>()?;
                        Datum::Array(items)
                    }
                    Some(StoreEntry::Leaf(_)) => {
                        return Err(SchemaError::malformed(format!(
                            "leaf stored where items were expected at '{}'",
                            path
                        )))
                    }
                    None => return Err(missing(&path)),
                }
            }
            _ => match store.get(&path) {
                Some(StoreEntry::Leaf(value)) => value.clone(),
                Some(StoreEntry::Items(_)) => {
                    return Err(SchemaError::malformed(format!(
                        "items stored where a leaf was expected at '{}'",
                        path
                    )))
                }
                None => return Err(missing(&path)),
            },
        };
        assembled.push((field.name.clone(), value));
    }

    Ok(Datum::Record(assembled))
}

/// Array items carry no parent prefix: record items reassemble from the
/// item store's own paths, scalar items live under the empty path.
fn assemble_item(element: &SchemaNode, item: &FlattenedStore) -> SchemaResult<Datum> {
    match element {
        SchemaNode::Record { .. } => assemble_record(element, item, ""),
        _ => match item.get("") {
            Some(StoreEntry::Leaf(value)) => Ok(value.clone()),
            _ => Err(SchemaError::malformed("scalar array item without a value")),
        },
    }
}

fn missing(path: &str) -> SchemaError {
    SchemaError::malformed(format!("no value collected for path '{}'", path))
}
