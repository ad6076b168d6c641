//! Error types for CDEvents construction, conversion and validation

use thiserror::Error;

use crate::schema::SchemaViolation;

#[derive(Error, Debug)]
pub enum CDEventError {
    /// A required field was missing or empty when building an event.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// No event class is registered for the type string.
    #[error("unknown event type: {event_type}")]
    UnknownEventType { event_type: String },

    /// The envelope or its data does not match the expected event shape.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// A registered event type has no schema document.
    #[error("no schema found for {event_type} (lookup key: {key})")]
    SchemaNotFound { event_type: String, key: String },

    /// A schema document could not be compiled.
    #[error("invalid schema {key}: {reason}")]
    InvalidSchema { key: String, reason: String },

    #[error("{event_type} failed schema validation with {} violation(s)", violations.len())]
    SchemaValidationFailed {
        event_type: String,
        violations: Vec<SchemaViolation>,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl CDEventError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedPayload(msg.into())
    }

    pub fn unknown_type(event_type: impl Into<String>) -> Self {
        Self::UnknownEventType {
            event_type: event_type.into(),
        }
    }
}

/// Result type for CDEvents operations
pub type Result<T> = std::result::Result<T, CDEventError>;

/// Fail with `InvalidArgument` when `value` is empty or whitespace only.
pub(crate) fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CDEventError::invalid_argument(format!(
            "{field} must not be empty"
        )));
    }
    Ok(())
}
