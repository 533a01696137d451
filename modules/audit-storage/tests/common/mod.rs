#![allow(dead_code)]

use axum::body::Body;
use axum::http::Request;
use axum::Router;
use http_body_util::BodyExt;
use std::io;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

pub const SUBJECT: &str = "projects/p/buckets/b/objects/o";
pub const AUDIT_LOG_TYPE: &str = "google.cloud.audit.log.v1.written";

/// Build the full receiver router for testing.
pub fn app() -> Router {
    audit_storage_rs::routes::router()
}

/// Binary-mode CloudEvent request carrying `payload` as data.
pub fn binary_event(subject: &str, payload: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .header("ce-specversion", "1.0")
        .header("ce-id", format!("evt-{}", std::process::id()))
        .header("ce-source", "//cloudaudit.googleapis.com/projects/p/logs/activity")
        .header("ce-type", AUDIT_LOG_TYPE)
        .header("ce-subject", subject)
        .header("ce-time", "2024-03-01T12:00:00Z")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

/// Structured-mode CloudEvent request with the audit log inlined as `data`.
pub fn structured_event(subject: &str, data: serde_json::Value) -> Request<Body> {
    let event = serde_json::json!({
        "specversion": "1.0",
        "id": "evt-structured",
        "source": "//cloudaudit.googleapis.com/projects/p/logs/data_access",
        "type": AUDIT_LOG_TYPE,
        "subject": subject,
        "datacontenttype": "application/json",
        "data": data
    });

    Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/cloudevents+json")
        .body(Body::from(event.to_string()))
        .unwrap()
}

/// Read response body as text.
pub async fn body_text(response: axum::http::Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Read response body as JSON.
pub async fn body_json(response: axum::http::Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// In-memory log sink for asserting on emitted log lines.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    /// Install as the subscriber for the current thread until the guard drops.
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
