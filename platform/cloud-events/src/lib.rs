//! # CloudEvents over HTTP
//!
//! Parses the envelope that push-style event transports (Eventarc, Knative,
//! Pub/Sub push with CloudEvents) put around an event, so receiving modules
//! only deal with typed attributes and the raw data bytes.
//!
//! ## Usage
//!
//! ```rust
//! use cloud_events::CloudEvent;
//! use http::HeaderMap;
//!
//! let mut headers = HeaderMap::new();
//! headers.insert("ce-specversion", "1.0".parse().unwrap());
//! headers.insert("ce-id", "evt-1".parse().unwrap());
//! headers.insert("ce-source", "//storage.googleapis.com".parse().unwrap());
//! headers.insert("ce-type", "google.cloud.audit.log.v1.written".parse().unwrap());
//! headers.insert("ce-subject", "buckets/b/objects/o".parse().unwrap());
//!
//! let event = CloudEvent::from_http(&headers, bytes::Bytes::new()).unwrap();
//! assert_eq!(event.subject(), "buckets/b/objects/o");
//! ```
//!
//! With the `axum` feature, `CloudEvent` can be used directly as a handler
//! argument.

mod binding;
mod error;
mod event;
#[cfg(feature = "axum")]
mod extract;

pub use error::{EnvelopeError, EnvelopeResult};
pub use event::{CloudEvent, SpecVersion};
#[cfg(feature = "axum")]
pub use extract::EnvelopeRejection;
