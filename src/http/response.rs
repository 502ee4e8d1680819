//! Syntactic decoding of node responses.
//!
//! [`RawResponse`] is the parsed JSON object returned by the node. It knows
//! nothing about individual commands; the typed views in [`super::types`]
//! read their fields through [`RawResponse::required`].

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

/// Keys the node uses to report a failed command, in lookup order.
const ERROR_KEYS: [&str; 2] = ["error", "exception"];

/// Reasons a typed view cannot be built from a [`RawResponse`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    #[error("node reported an error: {0}")]
    Remote(String),

    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` has an unexpected type: {reason}")]
    UnexpectedFieldType { field: &'static str, reason: String },
}

/// A decoded node response: one JSON object, immutable once parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    body: Map<String, Value>,
}

impl RawResponse {
    /// Parses raw response bytes.
    ///
    /// Fails when the bytes are not JSON or when the JSON is not an object.
    pub fn decode(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        let body = serde_json::from_slice(bytes)?;
        Ok(Self { body })
    }

    pub fn from_map(body: Map<String, Value>) -> Self {
        Self { body }
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.body.get(name)
    }

    /// The node-reported failure message, if this is an error body.
    pub fn error_message(&self) -> Option<String> {
        ERROR_KEYS
            .iter()
            .find_map(|key| self.body.get(*key))
            .map(|value| match value {
                Value::String(message) => message.clone(),
                other => other.to_string(),
            })
    }

    /// Reads `field` and converts it to `T`.
    ///
    /// An absent or `null` field is [`ViewError::MissingField`]; a present
    /// field that does not convert is [`ViewError::UnexpectedFieldType`].
    pub fn required<T: DeserializeOwned>(&self, field: &'static str) -> Result<T, ViewError> {
        match self.body.get(field) {
            None | Some(Value::Null) => Err(ViewError::MissingField(field)),
            Some(value) => T::deserialize(value).map_err(|e| ViewError::UnexpectedFieldType {
                field,
                reason: e.to_string(),
            }),
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.body
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.body
    }
}
