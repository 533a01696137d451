use axum::Json;
use serde_json::{json, Value};

use crate::handlers::EXPECTED_SERVICE_NAME;

/// `GET /health`: liveness plus the audit-log service this receiver accepts
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "audit-storage-rs",
        "version": env!("CARGO_PKG_VERSION"),
        "expected_service": EXPECTED_SERVICE_NAME
    }))
}
