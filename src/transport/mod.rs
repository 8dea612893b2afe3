//! Transport handoff
//!
//! The assembled object graph plus its key field are handed to a
//! `Publisher`. Delivery acknowledgment, retries, and partitioning are
//! the transport's concern, not the builder's. The shipped
//! implementation appends one JSON line per record to a file, which is
//! enough for local pipelines and tests.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::value::Datum;

/// Result type for transport operations
pub type TransportResult<T> = Result<T, TransportError>;

/// Errors from the publish boundary.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Transport unavailable: {0}")]
    Unavailable(String),

    #[error("Publish failed: {0}")]
    PublishFailed(String),
}

/// One published record.
#[derive(Debug, Clone, Serialize)]
pub struct PublishEnvelope {
    /// Stream / subject the record belongs to
    pub subject: String,
    /// Rendered value of the designated key field
    pub key: String,
    /// The assembled object graph as JSON
    pub value: serde_json::Value,
    /// Per-record identifier for correlation in logs
    pub record_id: Uuid,
    /// RFC 3339 publish timestamp
    pub published_at: String,
}

impl PublishEnvelope {
    /// Builds an envelope from an assembled graph and its key field.
    pub fn new(subject: impl Into<String>, key_field: &str, graph: &Datum) -> Self {
        let key = graph
            .field(key_field)
            .map(Datum::render_key)
            .unwrap_or_default();
        Self {
            subject: subject.into(),
            key,
            value: graph.to_json(),
            record_id: Uuid::new_v4(),
            published_at: Utc::now().to_rfc3339(),
        }
    }
}

/// External publish boundary.
pub trait Publisher {
    /// Connection check, run once before the session loop starts.
    fn probe(&self) -> TransportResult<()>;

    /// Hands one envelope to the transport.
    fn publish(&mut self, envelope: &PublishEnvelope) -> TransportResult<()>;
}

/// Appends envelopes as JSON lines to a file.
pub struct JsonlPublisher {
    path: PathBuf,
}

impl JsonlPublisher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Publisher for JsonlPublisher {
    fn probe(&self) -> TransportResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| TransportError::Unavailable(e.to_string()))?;
            }
        }
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map(|_| ())
            .map_err(|e| TransportError::Unavailable(e.to_string()))
    }

    fn publish(&mut self, envelope: &PublishEnvelope) -> TransportResult<()> {
        let line = serde_json::to_string(envelope)
            .map_err(|e| TransportError::PublishFailed(e.to_string()))?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| TransportError::PublishFailed(e.to_string()))?;
        writeln!(file, "{}", line).map_err(|e| TransportError::PublishFailed(e.to_string()))?;
        Ok(())
    }
}

/// Collects envelopes in memory; used in tests.
#[derive(Default)]
pub struct MemoryPublisher {
    pub published: Vec<PublishEnvelope>,
}

impl MemoryPublisher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Publisher for MemoryPublisher {
    fn probe(&self) -> TransportResult<()> {
        Ok(())
    }

    fn publish(&mut self, envelope: &PublishEnvelope) -> TransportResult<()> {
        self.published.push(envelope.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_graph() -> Datum {
        Datum::Record(vec![
            ("orderId".into(), Datum::Int(1001)),
            ("totalPrice".into(), Datum::Double(29.97)),
        ])
    }

    #[test]
    fn test_envelope_key_from_field() {
        let envelope = PublishEnvelope::new("store-orders", "orderId", &sample_graph());
        assert_eq!(envelope.key, "1001");
        assert_eq!(envelope.subject, "store-orders");
        assert_eq!(envelope.value["orderId"], serde_json::json!(1001));
    }

    #[test]
    fn test_jsonl_publisher_appends_lines() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.jsonl");
        let mut publisher = JsonlPublisher::new(&path);
        publisher.probe().unwrap();

        let graph = sample_graph();
        publisher
            .publish(&PublishEnvelope::new("store-orders", "orderId", &graph))
            .unwrap();
        publisher
            .publish(&PublishEnvelope::new("store-orders", "orderId", &graph))
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
        let first: serde_json::Value = serde_json::from_str(content.lines().next().unwrap()).unwrap();
        assert_eq!(first["key"], "1001");
    }

    #[test]
    fn test_probe_fails_for_unwritable_path() {
        let publisher = JsonlPublisher::new("/proc/recordcast/out.jsonl");
        assert!(publisher.probe().is_err());
    }
}
