//! # HTTP Protocol Binding
//!
//! Reads a [`CloudEvent`] out of an HTTP request in either content mode:
//!
//! - **Binary**: attributes travel in `ce-*` headers (percent-encoded),
//!   `Content-Type` is the data content type and the body is the data.
//! - **Structured**: `Content-Type: application/cloudevents+json` and the
//!   body is a JSON document holding attributes and `data`/`data_base64`.
//!
//! Batched mode (`application/cloudevents-batch+json`) is rejected.

use base64::Engine;
use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::HeaderMap;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::{EnvelopeError, EnvelopeResult};
use crate::event::{CloudEvent, SpecVersion};

const CE_HEADER_PREFIX: &str = "ce-";
const STRUCTURED_MEDIA_TYPE: &str = "application/cloudevents";
const BATCH_MEDIA_TYPE: &str = "application/cloudevents-batch";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContentMode {
    Binary,
    Structured,
}

impl CloudEvent {
    /// Parse an event from request headers and the full request body.
    ///
    /// # Errors
    ///
    /// Returns an [`EnvelopeError`] describing the first problem found. A
    /// failure here is always the sender's fault.
    pub fn from_http(headers: &HeaderMap, body: Bytes) -> EnvelopeResult<Self> {
        let content_type = content_type(headers)?;
        let mode = content_mode(headers, content_type.as_deref())?;

        tracing::debug!(?mode, body_len = body.len(), "Parsing CloudEvent");

        match mode {
            ContentMode::Binary => from_binary(headers, content_type, body),
            ContentMode::Structured => from_structured(&body),
        }
    }
}

fn content_type(headers: &HeaderMap) -> EnvelopeResult<Option<String>> {
    headers
        .get(CONTENT_TYPE)
        .map(|v| {
            v.to_str()
                .map(str::to_string)
                .map_err(|_| EnvelopeError::InvalidHeader(CONTENT_TYPE.to_string()))
        })
        .transpose()
}

/// Media type without parameters, lowercased
fn media_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

fn content_mode(headers: &HeaderMap, content_type: Option<&str>) -> EnvelopeResult<ContentMode> {
    if let Some(ct) = content_type {
        let media = media_type(ct);

        if media.starts_with(BATCH_MEDIA_TYPE) {
            return Err(EnvelopeError::BatchNotSupported);
        }

        if media.starts_with(STRUCTURED_MEDIA_TYPE) {
            if media != STRUCTURED_MEDIA_TYPE && media != "application/cloudevents+json" {
                return Err(EnvelopeError::UnsupportedEventFormat(media));
            }
            return Ok(ContentMode::Structured);
        }
    }

    if headers.contains_key("ce-specversion") {
        Ok(ContentMode::Binary)
    } else {
        Err(EnvelopeError::UnrecognizedFormat)
    }
}

fn from_binary(
    headers: &HeaderMap,
    content_type: Option<String>,
    body: Bytes,
) -> EnvelopeResult<CloudEvent> {
    let mut attrs = BTreeMap::new();

    for (name, value) in headers {
        let Some(attr) = name.as_str().strip_prefix(CE_HEADER_PREFIX) else {
            continue;
        };

        let raw = value
            .to_str()
            .map_err(|_| EnvelopeError::InvalidHeader(name.to_string()))?;
        let decoded = urlencoding::decode(raw)
            .map_err(|_| EnvelopeError::InvalidHeader(name.to_string()))?;

        // Repeated headers: first one wins
        attrs
            .entry(attr.to_string())
            .or_insert_with(|| decoded.into_owned());
    }

    if let Some(ct) = content_type {
        attrs.insert("datacontenttype".to_string(), ct);
    }

    CloudEvent::from_attributes(attrs, body)
}

fn from_structured(body: &[u8]) -> EnvelopeResult<CloudEvent> {
    let value: Value =
        serde_json::from_slice(body).map_err(|e| EnvelopeError::MalformedJson(e.to_string()))?;

    let Value::Object(mut object) = value else {
        return Err(EnvelopeError::MalformedJson(
            "structured event must be a JSON object".to_string(),
        ));
    };

    let data = object.remove("data").filter(|v| !v.is_null());
    let data_base64 = object.remove("data_base64").filter(|v| !v.is_null());

    let mut attrs = BTreeMap::new();
    for (name, value) in object {
        let value = match value {
            Value::String(s) => s,
            Value::Null => continue,
            Value::Bool(_) | Value::Number(_) => value.to_string(),
            Value::Array(_) | Value::Object(_) => {
                return Err(EnvelopeError::InvalidAttribute {
                    name,
                    reason: "must be a string, number or boolean",
                })
            }
        };
        attrs.insert(name, value);
    }

    let encoding = attrs.remove("datacontentencoding");
    let mut event = CloudEvent::from_attributes(attrs, Bytes::new())?;

    let base64_string_data = event.spec_version() == SpecVersion::V03
        && encoding.as_deref().is_some_and(|e| e.eq_ignore_ascii_case("base64"));

    let bytes = structured_data(
        data,
        data_base64,
        event.data_content_type(),
        base64_string_data,
    )?;

    event.set_data(bytes);
    Ok(event)
}

fn structured_data(
    data: Option<Value>,
    data_base64: Option<Value>,
    content_type: Option<&str>,
    base64_string_data: bool,
) -> EnvelopeResult<Bytes> {
    match (data, data_base64) {
        (Some(_), Some(_)) => Err(EnvelopeError::ConflictingData),
        (None, None) => Ok(Bytes::new()),
        (None, Some(Value::String(encoded))) => decode_base64(&encoded),
        (None, Some(_)) => Err(EnvelopeError::InvalidAttribute {
            name: "data_base64".to_string(),
            reason: "must be a string",
        }),
        (Some(Value::String(s)), None) if base64_string_data => decode_base64(&s),
        (Some(Value::String(s)), None) if !is_json(content_type) => Ok(Bytes::from(s)),
        (Some(value), None) => serde_json::to_vec(&value)
            .map(Bytes::from)
            .map_err(|e| EnvelopeError::MalformedJson(e.to_string())),
    }
}

fn decode_base64(encoded: &str) -> EnvelopeResult<Bytes> {
    base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map(Bytes::from)
        .map_err(|e| EnvelopeError::InvalidBase64(e.to_string()))
}

/// Structured events default to JSON data when no content type is given
fn is_json(content_type: Option<&str>) -> bool {
    match content_type {
        None => true,
        Some(ct) => {
            let media = media_type(ct);
            media == "application/json" || media == "text/json" || media.ends_with("+json")
        }
    }
}
