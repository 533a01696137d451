//! axum extractor for [`CloudEvent`].
//!
//! Handlers that want to answer malformed envelopes themselves can take
//! `Result<CloudEvent, EnvelopeRejection>` instead of `CloudEvent`.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error::EnvelopeError;
use crate::event::CloudEvent;

/// Why the [`CloudEvent`] extractor refused a request
#[derive(Debug)]
pub enum EnvelopeRejection {
    /// The body could not be read (too large, connection dropped, ...)
    Body(BytesRejection),
    /// The body was read but is not a valid CloudEvent
    Envelope(EnvelopeError),
}

impl IntoResponse for EnvelopeRejection {
    fn into_response(self) -> Response {
        match self {
            EnvelopeRejection::Body(rejection) => rejection.into_response(),
            EnvelopeRejection::Envelope(err) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": err.to_string() })),
            )
                .into_response(),
        }
    }
}

impl<S> FromRequest<S> for CloudEvent
where
    S: Send + Sync,
{
    type Rejection = EnvelopeRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let headers = req.headers().clone();
        let body = Bytes::from_request(req, state)
            .await
            .map_err(EnvelopeRejection::Body)?;

        CloudEvent::from_http(&headers, body).map_err(EnvelopeRejection::Envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, routing::post, Router};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    async fn echo_subject(event: CloudEvent) -> String {
        event.subject().to_string()
    }

    fn app() -> Router {
        Router::new().route("/", post(echo_subject))
    }

    #[tokio::test]
    async fn test_extracts_binary_event() {
        let response = app()
            .oneshot(
                axum::http::Request::builder()
                    .method("POST")
                    .uri("/")
                    .header("ce-specversion", "1.0")
                    .header("ce-id", "evt-1")
                    .header("ce-source", "s")
                    .header("ce-type", "t")
                    .header("ce-subject", "buckets/b/objects/o")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"buckets/b/objects/o");
    }

    #[tokio::test]
    async fn test_rejects_non_event_with_400() {
        let response = app()
            .oneshot(
                axum::http::Request::builder()
                    .method("POST")
                    .uri("/")
                    .header("content-type", "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["error"].as_str().unwrap().contains("not a CloudEvent"));
    }
}
