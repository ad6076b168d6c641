//! Opaque caller payload carried alongside an event.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CDEventError, Result};

/// Media type used for structured custom data and for envelope payloads.
pub const APPLICATION_JSON: &str = "application/json";

/// Custom data is either raw text or a JSON mapping; its shape survives
/// serialization unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CustomData {
    Text(String),
    Structured(Map<String, Value>),
}

impl CustomData {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CustomData::Text(text) => Some(text),
            CustomData::Structured(_) => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map<String, Value>> {
        match self {
            CustomData::Structured(map) => Some(map),
            CustomData::Text(_) => None,
        }
    }
}

impl From<String> for CustomData {
    fn from(text: String) -> Self {
        CustomData::Text(text)
    }
}

impl From<&str> for CustomData {
    fn from(text: &str) -> Self {
        CustomData::Text(text.to_string())
    }
}

impl From<Map<String, Value>> for CustomData {
    fn from(map: Map<String, Value>) -> Self {
        CustomData::Structured(map)
    }
}

impl TryFrom<Value> for CustomData {
    type Error = CDEventError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::String(text) => Ok(CustomData::Text(text)),
            Value::Object(map) => Ok(CustomData::Structured(map)),
            other => Err(CDEventError::invalid_argument(format!(
                "custom data must be a string or an object, got {other}"
            ))),
        }
    }
}
