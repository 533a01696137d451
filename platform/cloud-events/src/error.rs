use thiserror::Error;

/// Reasons an inbound HTTP request could not be read as a CloudEvent.
///
/// Every variant describes a problem with the request itself, so callers
/// should answer with a client error and keep serving.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvelopeError {
    #[error("batched CloudEvents are not supported")]
    BatchNotSupported,

    #[error("request is not a CloudEvent: no ce-specversion header and content type is not application/cloudevents")]
    UnrecognizedFormat,

    #[error("unsupported structured event format: {0}")]
    UnsupportedEventFormat(String),

    #[error("missing required attribute: {0}")]
    MissingAttribute(&'static str),

    #[error("attribute {0} cannot be empty")]
    EmptyAttribute(&'static str),

    #[error("invalid attribute {name}: {reason}")]
    InvalidAttribute { name: String, reason: &'static str },

    #[error("unsupported specversion: {0}")]
    UnsupportedSpecVersion(String),

    #[error("invalid time attribute '{value}': {reason}")]
    InvalidTime { value: String, reason: String },

    #[error("invalid header {0}")]
    InvalidHeader(String),

    #[error("malformed structured event: {0}")]
    MalformedJson(String),

    #[error("invalid data_base64: {0}")]
    InvalidBase64(String),

    #[error("event carries both data and data_base64")]
    ConflictingData,
}

/// Result type for envelope parsing
pub type EnvelopeResult<T> = Result<T, EnvelopeError>;
