//! Flattened value store
//!
//! Leaf values accumulate here during traversal, keyed by dotted path
//! (`user.email`). Array fields hold one sub-store per item; items never
//! carry the parent's path prefix. A path is written exactly once, only
//! after the value passed validation, so the store never contains a
//! partially-built entry.

use crate::schema::{SchemaError, SchemaResult};
use crate::value::Datum;

/// One stored value: a coerced leaf, or the ordered item stores of an
/// array field.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEntry {
    Leaf(Datum),
    Items(Vec<FlattenedStore>),
}

/// Insertion-ordered map from dotted path to stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlattenedStore {
    entries: Vec<(String, StoreEntry)>,
}

impl FlattenedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a coerced leaf value. Duplicate paths violate the
    /// write-once invariant and are structural errors.
    pub fn insert_leaf(&mut self, path: impl Into<String>, value: Datum) -> SchemaResult<()> {
        self.insert(path.into(), StoreEntry::Leaf(value))
    }

    /// Stores the collected items of an array field.
    pub fn insert_items(
        &mut self,
        path: impl Into<String>,
        items: Vec<FlattenedStore>,
    ) -> SchemaResult<()> {
        self.insert(path.into(), StoreEntry::Items(items))
    }

    fn insert(&mut self, path: String, entry: StoreEntry) -> SchemaResult<()> {
        if self.contains(&path) {
            return Err(SchemaError::malformed(format!(
                "path '{}' written twice",
                path
            )));
        }
        self.entries.push((path, entry));
        Ok(())
    }

    /// Merges a sub-record's store into this one. Entries arrive already
    /// prefixed with the sub-record's path.
    pub fn merge(&mut self, other: FlattenedStore) -> SchemaResult<()> {
        for (path, entry) in other.entries {
            self.insert(path, entry)?;
        }
        Ok(())
    }

    pub fn get(&self, path: &str) -> Option<&StoreEntry> {
        self.entries
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, e)| e)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.iter().any(|(p, _)| p == path)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &StoreEntry)> {
        self.entries.iter().map(|(p, e)| (p.as_str(), e))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Joins a path prefix and a field name with a dot.
pub fn join_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", prefix, field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_preserved() {
        let mut store = FlattenedStore::new();
        store.insert_leaf("b", Datum::Int(2)).unwrap();
        store.insert_leaf("a", Datum::Int(1)).unwrap();

        let paths: Vec<_> = store.iter().map(|(p, _)| p).collect();
        assert_eq!(paths, ["b", "a"]);
    }

    #[test]
    fn test_duplicate_path_rejected() {
        let mut store = FlattenedStore::new();
        store.insert_leaf("orderId", Datum::Int(1)).unwrap();
        let err = store.insert_leaf("orderId", Datum::Int(2)).unwrap_err();
        assert!(err.to_string().contains("written twice"));
    }

    #[test]
    fn test_merge_prefixed_substore() {
        let mut sub = FlattenedStore::new();
        sub.insert_leaf("user.userId", Datum::Str("u1".into()))
            .unwrap();
        sub.insert_leaf("user.email", Datum::Str("ana@x.com".into()))
            .unwrap();

        let mut store = FlattenedStore::new();
        store.insert_leaf("orderId", Datum::Int(1001)).unwrap();
        store.merge(sub).unwrap();

        assert_eq!(store.len(), 3);
        assert_eq!(
            store.get("user.email"),
            Some(&StoreEntry::Leaf(Datum::Str("ana@x.com".into())))
        );
    }

    #[test]
    fn test_merge_detects_collision() {
        let mut a = FlattenedStore::new();
        a.insert_leaf("x", Datum::Int(1)).unwrap();
        let mut b = FlattenedStore::new();
        b.insert_leaf("x", Datum::Int(2)).unwrap();

        assert!(a.merge(b).is_err());
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("", "orderId"), "orderId");
        assert_eq!(join_path("user", "email"), "user.email");
    }
}
