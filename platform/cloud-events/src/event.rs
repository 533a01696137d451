//! # CloudEvent
//!
//! The envelope delivered by push-style event transports. Context attributes
//! describe where the event came from and what it is about; `data` is opaque
//! to this crate and decoded by the receiving module.
//!
//! ## Attributes
//!
//! - `specversion`, `id`, `source`, `type`: required, non-empty
//! - `subject`: resource the event is about (e.g. a storage object path)
//! - `time`: RFC 3339 timestamp of the occurrence
//! - `datacontenttype`, `dataschema`: describe `data`
//! - anything else is kept as an extension attribute

use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use crate::error::{EnvelopeError, EnvelopeResult};

/// CloudEvents specification versions understood by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecVersion {
    V03,
    V10,
}

impl SpecVersion {
    pub fn parse(value: &str) -> EnvelopeResult<Self> {
        match value {
            "1.0" => Ok(SpecVersion::V10),
            "0.3" => Ok(SpecVersion::V03),
            other => Err(EnvelopeError::UnsupportedSpecVersion(other.to_string())),
        }
    }
}

/// A single CloudEvent received over HTTP.
///
/// Lives for one request. Construct it with [`CloudEvent::from_http`] on the
/// receiving side, or with [`CloudEvent::new`] and the `with_*` setters in
/// tests.
///
/// # Examples
///
/// ```rust
/// use cloud_events::CloudEvent;
///
/// let event = CloudEvent::new(
///     "evt-1".to_string(),
///     "//storage.googleapis.com/projects/_/buckets/b".to_string(),
///     "google.cloud.audit.log.v1.written".to_string(),
/// )
/// .with_subject("projects/_/buckets/b/objects/o".to_string());
///
/// assert_eq!(event.subject(), "projects/_/buckets/b/objects/o");
/// assert!(event.data().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CloudEvent {
    spec_version: SpecVersion,
    id: String,
    source: String,
    ty: String,
    subject: Option<String>,
    time: Option<DateTime<Utc>>,
    data_content_type: Option<String>,
    data_schema: Option<String>,
    extensions: BTreeMap<String, String>,
    data: Bytes,
}

impl CloudEvent {
    /// Create a 1.0 event with the required attributes and no data
    pub fn new(id: String, source: String, ty: String) -> Self {
        Self {
            spec_version: SpecVersion::V10,
            id,
            source,
            ty,
            subject: None,
            time: None,
            data_content_type: None,
            data_schema: None,
            extensions: BTreeMap::new(),
            data: Bytes::new(),
        }
    }

    pub fn with_subject(mut self, subject: String) -> Self {
        self.subject = Some(subject);
        self
    }

    /// Set the payload together with its content type
    pub fn with_data(mut self, content_type: impl Into<String>, data: impl Into<Bytes>) -> Self {
        self.data_content_type = Some(content_type.into());
        self.data = data.into();
        self
    }

    pub fn spec_version(&self) -> SpecVersion {
        self.spec_version
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn ty(&self) -> &str {
        &self.ty
    }

    /// The subject, or an empty string when the event has none
    pub fn subject(&self) -> &str {
        self.subject.as_deref().unwrap_or_default()
    }

    pub fn time(&self) -> Option<DateTime<Utc>> {
        self.time
    }

    pub fn data_content_type(&self) -> Option<&str> {
        self.data_content_type.as_deref()
    }

    pub fn data_schema(&self) -> Option<&str> {
        self.data_schema.as_deref()
    }

    pub fn extension(&self, name: &str) -> Option<&str> {
        self.extensions.get(name).map(String::as_str)
    }

    pub fn extensions(&self) -> &BTreeMap<String, String> {
        &self.extensions
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub(crate) fn set_data(&mut self, data: Bytes) {
        self.data = data;
    }

    /// Build an event from raw attribute values, validating the required ones.
    ///
    /// Known attributes are removed from `attrs`; whatever remains becomes
    /// the extension set.
    pub(crate) fn from_attributes(
        mut attrs: BTreeMap<String, String>,
        data: Bytes,
    ) -> EnvelopeResult<Self> {
        let spec_version = SpecVersion::parse(&take_required(&mut attrs, "specversion")?)?;
        let id = take_required(&mut attrs, "id")?;
        let source = take_required(&mut attrs, "source")?;
        let ty = take_required(&mut attrs, "type")?;

        let subject = attrs.remove("subject");
        let time = attrs.remove("time").map(|t| parse_time(&t)).transpose()?;
        let data_content_type = attrs.remove("datacontenttype");

        // 0.3 named it schemaurl
        let data_schema = match spec_version {
            SpecVersion::V10 => attrs.remove("dataschema"),
            SpecVersion::V03 => attrs.remove("schemaurl"),
        };

        Ok(Self {
            spec_version,
            id,
            source,
            ty,
            subject,
            time,
            data_content_type,
            data_schema,
            extensions: attrs,
            data,
        })
    }
}

fn take_required(
    attrs: &mut BTreeMap<String, String>,
    name: &'static str,
) -> EnvelopeResult<String> {
    let value = attrs
        .remove(name)
        .ok_or(EnvelopeError::MissingAttribute(name))?;

    if value.trim().is_empty() {
        return Err(EnvelopeError::EmptyAttribute(name));
    }

    Ok(value)
}

fn parse_time(value: &str) -> EnvelopeResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| EnvelopeError::InvalidTime {
            value: value.to_string(),
            reason: e.to_string(),
        })
}
