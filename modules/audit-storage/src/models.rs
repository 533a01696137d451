//! Cloud Audit Log record (`google.cloud.audit.AuditLog`) as carried in the
//! data of `google.cloud.audit.log.v1.written` events.
//!
//! Decoding follows the protobuf JSON mapping: lowerCamelCase or original
//! field names, `null` means default, unknown fields are rejected, messages
//! must be JSON objects and integers may arrive as strings.

use serde::de::{self, DeserializeOwned, Unexpected};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::str::FromStr;

/// `google.protobuf.Struct`, `google.protobuf.Any` and messages kept opaque
pub type JsonObject = Map<String, Value>;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct AuditLog {
    /// API service that performed the operation, e.g. "storage.googleapis.com"
    #[serde(alias = "service_name", deserialize_with = "null_as_default")]
    pub service_name: String,

    /// e.g. "storage.objects.create"
    #[serde(alias = "method_name", deserialize_with = "null_as_default")]
    pub method_name: String,

    #[serde(alias = "resource_name", deserialize_with = "null_as_default")]
    pub resource_name: String,

    #[serde(alias = "resource_location", deserialize_with = "optional_message")]
    pub resource_location: Option<ResourceLocation>,

    #[serde(alias = "resource_original_state")]
    pub resource_original_state: Option<JsonObject>,

    #[serde(alias = "num_response_items", deserialize_with = "quoted_int")]
    pub num_response_items: i64,

    #[serde(deserialize_with = "optional_message")]
    pub status: Option<Status>,

    #[serde(alias = "authentication_info", deserialize_with = "optional_message")]
    pub authentication_info: Option<AuthenticationInfo>,

    #[serde(alias = "authorization_info", deserialize_with = "repeated_message")]
    pub authorization_info: Vec<AuthorizationInfo>,

    #[serde(alias = "policy_violation_info")]
    pub policy_violation_info: Option<JsonObject>,

    #[serde(alias = "request_metadata", deserialize_with = "optional_message")]
    pub request_metadata: Option<RequestMetadata>,

    pub request: Option<JsonObject>,

    pub response: Option<JsonObject>,

    pub metadata: Option<JsonObject>,

    #[serde(alias = "service_data")]
    pub service_data: Option<JsonObject>,
}

impl AuditLog {
    /// Decode an audit log from protobuf-JSON bytes.
    ///
    /// Anything other than a JSON object (including an empty body) is an
    /// error.
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_slice(bytes)?;
        message(value)
    }

    pub fn principal_email(&self) -> Option<&str> {
        self.authentication_info
            .as_ref()
            .map(|a| a.principal_email.as_str())
            .filter(|e| !e.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ResourceLocation {
    #[serde(alias = "current_locations", deserialize_with = "null_as_default")]
    pub current_locations: Vec<String>,

    #[serde(alias = "original_locations", deserialize_with = "null_as_default")]
    pub original_locations: Vec<String>,
}

/// `google.rpc.Status`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Status {
    #[serde(deserialize_with = "quoted_int")]
    pub code: i32,

    #[serde(deserialize_with = "null_as_default")]
    pub message: String,

    #[serde(deserialize_with = "null_as_default")]
    pub details: Vec<JsonObject>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct AuthenticationInfo {
    #[serde(alias = "principal_email", deserialize_with = "null_as_default")]
    pub principal_email: String,

    #[serde(alias = "authority_selector", deserialize_with = "null_as_default")]
    pub authority_selector: String,

    #[serde(alias = "third_party_principal")]
    pub third_party_principal: Option<JsonObject>,

    #[serde(alias = "service_account_key_name", deserialize_with = "null_as_default")]
    pub service_account_key_name: String,

    #[serde(alias = "service_account_delegation_info", deserialize_with = "null_as_default")]
    pub service_account_delegation_info: Vec<JsonObject>,

    #[serde(alias = "principal_subject", deserialize_with = "null_as_default")]
    pub principal_subject: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct AuthorizationInfo {
    #[serde(deserialize_with = "null_as_default")]
    pub resource: String,

    #[serde(deserialize_with = "null_as_default")]
    pub permission: String,

    #[serde(deserialize_with = "null_as_default")]
    pub granted: bool,

    #[serde(alias = "resource_attributes")]
    pub resource_attributes: Option<JsonObject>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct RequestMetadata {
    #[serde(alias = "caller_ip", deserialize_with = "null_as_default")]
    pub caller_ip: String,

    #[serde(alias = "caller_supplied_user_agent", deserialize_with = "null_as_default")]
    pub caller_supplied_user_agent: String,

    #[serde(alias = "caller_network", deserialize_with = "null_as_default")]
    pub caller_network: String,

    #[serde(alias = "request_attributes")]
    pub request_attributes: Option<JsonObject>,

    #[serde(alias = "destination_attributes")]
    pub destination_attributes: Option<JsonObject>,
}

/// Derived struct deserializers also accept JSON arrays (fields in order);
/// protobuf messages must be objects.
fn message<T: DeserializeOwned>(value: Value) -> Result<T, serde_json::Error> {
    if !value.is_object() {
        let unexpected = match &value {
            Value::Null => Unexpected::Unit,
            Value::Bool(b) => Unexpected::Bool(*b),
            Value::Number(_) => Unexpected::Other("number"),
            Value::String(s) => Unexpected::Str(s),
            Value::Array(_) => Unexpected::Seq,
            Value::Object(_) => Unexpected::Map,
        };
        return Err(de::Error::invalid_type(unexpected, &"a JSON object"));
    }

    serde_json::from_value(value)
}

fn optional_message<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Option::<Value>::deserialize(deserializer)?
        .map(|v| message(v).map_err(de::Error::custom))
        .transpose()
}

fn repeated_message<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Option::<Vec<Value>>::deserialize(deserializer)?
        .unwrap_or_default()
        .into_iter()
        .map(|v| message(v).map_err(de::Error::custom))
        .collect()
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IntRepr<T> {
    Number(T),
    Text(String),
}

/// Protobuf JSON integers: a JSON number or a decimal string
fn quoted_int<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + FromStr + Deserialize<'de>,
{
    match Option::<IntRepr<T>>::deserialize(deserializer)? {
        None => Ok(T::default()),
        Some(IntRepr::Number(n)) => Ok(n),
        Some(IntRepr::Text(s)) => s
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid integer value: {s}"))),
    }
}
