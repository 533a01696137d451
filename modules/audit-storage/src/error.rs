use axum::{
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use cloud_events::{EnvelopeError, EnvelopeRejection};
use serde::Serialize;
use thiserror::Error;

/// Per-request failures. None of these stop the server.
#[derive(Debug, Error)]
pub enum ReceiveError {
    #[error("failed to read request body: {0}")]
    UnreadableBody(BytesRejection),

    #[error("malformed event envelope: {0}")]
    MalformedEnvelope(#[from] EnvelopeError),

    #[error("malformed audit log payload: {0}")]
    MalformedPayload(#[source] serde_json::Error),
}

impl ReceiveError {
    pub fn status(&self) -> StatusCode {
        match self {
            ReceiveError::UnreadableBody(rejection) => rejection.status(),
            ReceiveError::MalformedEnvelope(_) => StatusCode::BAD_REQUEST,
            ReceiveError::MalformedPayload(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl From<EnvelopeRejection> for ReceiveError {
    fn from(rejection: EnvelopeRejection) -> Self {
        match rejection {
            EnvelopeRejection::Body(body) => ReceiveError::UnreadableBody(body),
            EnvelopeRejection::Envelope(err) => ReceiveError::MalformedEnvelope(err),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ReceiveError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::warn!(status = status.as_u16(), error = %self, "Rejected event");

        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}

/// Startup failures. These end the process.
#[derive(Debug, Error)]
pub enum ServeError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}
