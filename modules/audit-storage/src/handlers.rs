//! Event receiver for Cloud Audit Log events.
//!
//! Eventarc delivers one CloudEvent per request. The data is an audit log
//! entry; only entries written by Cloud Storage are expected here.

use axum::http::StatusCode;
use cloud_events::{CloudEvent, EnvelopeRejection};

use crate::error::ReceiveError;
use crate::models::AuditLog;

/// Service name of audit entries this receiver accepts
pub const EXPECTED_SERVICE_NAME: &str = "storage.googleapis.com";

/// Outcome of inspecting one event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    /// Service that wrote the audit entry
    pub service_name: String,
    /// Caller recorded in the audit entry, when present
    pub principal_email: Option<String>,
    /// Acknowledgment text, logged and returned as the response body
    pub message: String,
}

impl Detection {
    pub fn matched(&self) -> bool {
        self.service_name == EXPECTED_SERVICE_NAME
    }

    /// 200 for Cloud Storage entries, 400 otherwise.
    ///
    /// A mismatch still carries the acknowledgment text; it is not
    /// short-circuited.
    pub fn status(&self) -> StatusCode {
        if self.matched() {
            StatusCode::OK
        } else {
            StatusCode::BAD_REQUEST
        }
    }
}

/// Decode the audit log carried by `event` and build the acknowledgment.
///
/// # Errors
///
/// `ReceiveError::MalformedPayload` if the event data is not a valid audit
/// log. A non-storage service name is not an error; see
/// [`Detection::matched`].
pub fn detect_storage_change(event: &CloudEvent) -> Result<Detection, ReceiveError> {
    let audit_log = AuditLog::from_json(event.data()).map_err(ReceiveError::MalformedPayload)?;

    Ok(Detection {
        principal_email: audit_log.principal_email().map(str::to_string),
        service_name: audit_log.service_name,
        message: format!(
            "Detected change in Cloud Storage bucket: {}",
            event.subject()
        ),
    })
}

/// Handler for any method on `/` (and every unmatched path)
pub async fn receive_event(
    event: Result<CloudEvent, EnvelopeRejection>,
) -> Result<(StatusCode, String), ReceiveError> {
    let event = event?;
    let detection = detect_storage_change(&event)?;

    if !detection.matched() {
        tracing::warn!(
            event_id = %event.id(),
            source = %event.source(),
            service_name = %detection.service_name,
            "non-storage audit log received: {}",
            detection.service_name
        );
    }

    tracing::info!(
        event_id = %event.id(),
        event_type = %event.ty(),
        subject = %event.subject(),
        principal = %detection.principal_email.as_deref().unwrap_or_default(),
        "{}",
        detection.message
    );

    Ok((detection.status(), detection.message))
}
