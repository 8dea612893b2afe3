//! Schema status HTTP routes
//!
//! `GET /health` reports liveness. `GET /schema-status` compares the
//! registry's latest schema for the configured subject against the
//! local schema the tool was started with:
//! - 200 when they are structurally equal
//! - 404 when the subject is unknown to the registry
//! - 417 with the rendered diff when they differ
//!
//! Handlers never panic; unexpected failures map to 500.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;

use crate::compare::compare;
use crate::observability::Logger;
use crate::registry::{FileRegistry, SchemaSource};
use crate::schema::{SchemaError, SchemaNode};

/// Shared state for the status surface: the registry handle plus the
/// immutable local schema being served.
pub struct StatusState {
    pub registry: FileRegistry,
    pub subject: String,
    pub local: SchemaNode,
}

impl StatusState {
    pub fn new(registry: FileRegistry, subject: impl Into<String>, local: SchemaNode) -> Self {
        Self {
            registry,
            subject: subject.into(),
            local,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct SchemaStatusResponse {
    pub status: String,
    pub subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Builds the status router.
pub fn status_routes(state: Arc<StatusState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/schema-status", get(schema_status_handler))
        .with_state(state)
}

async fn health_handler() -> impl IntoResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };
    (StatusCode::OK, Json(response))
}

async fn schema_status_handler(State(state): State<Arc<StatusState>>) -> impl IntoResponse {
    match state.registry.latest(&state.subject) {
        Ok(latest) => {
            let diff = compare(&latest, &state.local);
            if diff.is_equal() {
                Logger::info("schema_status", &[("subject", &state.subject), ("result", "up-to-date")]);
                (
                    StatusCode::OK,
                    Json(SchemaStatusResponse {
                        status: "up-to-date".into(),
                        subject: state.subject.clone(),
                        diff: None,
                        error: None,
                    }),
                )
            } else {
                Logger::warn("schema_status", &[("subject", &state.subject), ("result", "outdated")]);
                let reasons = diff.reasons().iter().map(|r| r.to_string()).collect();
                (
                    StatusCode::EXPECTATION_FAILED,
                    Json(SchemaStatusResponse {
                        status: "outdated".into(),
                        subject: state.subject.clone(),
                        diff: Some(reasons),
                        error: None,
                    }),
                )
            }
        }
        Err(SchemaError::NotFound { .. }) => {
            Logger::warn("schema_status", &[("subject", &state.subject), ("result", "not-found")]);
            (
                StatusCode::NOT_FOUND,
                Json(SchemaStatusResponse {
                    status: "not-found".into(),
                    subject: state.subject.clone(),
                    diff: None,
                    error: None,
                }),
            )
        }
        Err(err) => {
            Logger::error("schema_status", &[("subject", &state.subject), ("error", &err.to_string())]);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SchemaStatusResponse {
                    status: "error".into(),
                    subject: state.subject.clone(),
                    diff: None,
                    error: Some(err.to_string()),
                }),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::parse_document;
    use tempfile::TempDir;

    const V1: &str = r#"{
        "type": "record", "name": "Order",
        "fields": [{"name": "orderId", "type": "int"}]
    }"#;

    fn state_with(local: &str, registered: Option<&str>) -> (TempDir, Arc<StatusState>) {
        let tmp = TempDir::new().unwrap();
        let registry = FileRegistry::new(tmp.path());
        if let Some(doc) = registered {
            registry.register("store-orders", doc).unwrap();
        }
        let local = parse_document(local).unwrap();
        let state = Arc::new(StatusState::new(registry, "store-orders", local));
        (tmp, state)
    }

    #[tokio::test]
    async fn test_up_to_date() {
        let (_tmp, state) = state_with(V1, Some(V1));
        let response = schema_status_handler(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_subject_is_404() {
        let (_tmp, state) = state_with(V1, None);
        let response = schema_status_handler(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_outdated_is_417() {
        let newer = r#"{
            "type": "record", "name": "Order",
            "fields": [
                {"name": "orderId", "type": "int"},
                {"name": "totalPrice", "type": "float"}
            ]
        }"#;
        let (_tmp, state) = state_with(V1, Some(newer));
        let response = schema_status_handler(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::EXPECTATION_FAILED);
    }

    #[tokio::test]
    async fn test_health() {
        let response = health_handler().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
