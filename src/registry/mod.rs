//! Subject-keyed schema registry
//!
//! Directory-backed store of versioned schema documents:
//! `<root>/<subject>/<version>.avsc`, versions are positive integers.
//! `latest` resolves a subject name to its highest-version schema tree.
//! Registered trees are read-only after load.

use std::fs;
use std::path::{Path, PathBuf};

use crate::schema::{parse_document, SchemaError, SchemaNode, SchemaResult};

/// Resolves a subject name to its latest schema tree.
///
/// The record builder and the HTTP status surface only consume this
/// interface; the backing store is an implementation detail.
pub trait SchemaSource {
    fn latest(&self, subject: &str) -> SchemaResult<SchemaNode>;
}

/// File-system backed registry.
pub struct FileRegistry {
    root: PathBuf,
}

impl FileRegistry {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lists registered subjects in sorted order.
    pub fn subjects(&self) -> SchemaResult<Vec<String>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }
        let entries = fs::read_dir(&self.root).map_err(|e| {
            SchemaError::malformed(format!(
                "failed to read registry root '{}': {}",
                self.root.display(),
                e
            ))
        })?;

        let mut subjects = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                SchemaError::malformed(format!("failed to read registry entry: {}", e))
            })?;
            if entry.path().is_dir() {
                if let Some(name) = entry.file_name().to_str() {
                    subjects.push(name.to_string());
                }
            }
        }
        subjects.sort();
        Ok(subjects)
    }

    /// Lists a subject's versions in ascending order.
    pub fn versions(&self, subject: &str) -> SchemaResult<Vec<u32>> {
        let dir = self.root.join(subject);
        if !dir.is_dir() {
            return Err(SchemaError::not_found(subject));
        }
        let entries = fs::read_dir(&dir).map_err(|e| {
            SchemaError::malformed(format!(
                "failed to read subject directory '{}': {}",
                dir.display(),
                e
            ))
        })?;

        let mut versions = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                SchemaError::malformed(format!("failed to read registry entry: {}", e))
            })?;
            let path = entry.path();
            if path.extension().map_or(true, |ext| ext != "avsc") {
                continue;
            }
            let stem = path.file_stem().and_then(|s| s.to_str());
            if let Some(version) = stem.and_then(|s| s.parse::<u32>().ok()) {
                if version > 0 {
                    versions.push(version);
                }
            }
        }
        if versions.is_empty() {
            return Err(SchemaError::not_found(subject));
        }
        versions.sort_unstable();
        Ok(versions)
    }

    /// Returns the highest registered version and its parsed schema tree.
    pub fn latest_version(&self, subject: &str) -> SchemaResult<(u32, SchemaNode)> {
        let versions = self.versions(subject)?;
        // versions is non-empty here
        let version = *versions.last().unwrap_or(&1);
        let schema = self.load(subject, version)?;
        Ok((version, schema))
    }

    /// Loads one specific version of a subject's schema.
    pub fn load(&self, subject: &str, version: u32) -> SchemaResult<SchemaNode> {
        let path = self.schema_path(subject, version);
        let text = fs::read_to_string(&path).map_err(|e| {
            SchemaError::malformed(format!(
                "failed to read schema file '{}': {}",
                path.display(),
                e
            ))
        })?;
        parse_document(&text)
    }

    /// Registers a new schema document under the next version number.
    ///
    /// The document is parsed and shape-checked before anything is
    /// written, so the registry never holds a malformed schema.
    pub fn register(&self, subject: &str, document: &str) -> SchemaResult<u32> {
        parse_document(document)?;

        let next = match self.versions(subject) {
            Ok(versions) => versions.last().copied().unwrap_or(0) + 1,
            Err(SchemaError::NotFound { .. }) => 1,
            Err(e) => return Err(e),
        };

        let dir = self.root.join(subject);
        fs::create_dir_all(&dir).map_err(|e| {
            SchemaError::malformed(format!(
                "failed to create subject directory '{}': {}",
                dir.display(),
                e
            ))
        })?;

        let path = self.schema_path(subject, next);
        fs::write(&path, document).map_err(|e| {
            SchemaError::malformed(format!(
                "failed to write schema file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Ok(next)
    }

    fn schema_path(&self, subject: &str, version: u32) -> PathBuf {
        self.root.join(subject).join(format!("{}.avsc", version))
    }
}

impl SchemaSource for FileRegistry {
    fn latest(&self, subject: &str) -> SchemaResult<SchemaNode> {
        self.latest_version(subject).map(|(_, schema)| schema)
    }
}
