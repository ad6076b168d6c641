//! CloudEvents binding.
//!
//! An event maps onto a CloudEvents 1.0 envelope as follows:
//!
//! | envelope          | event                      |
//! |-------------------|----------------------------|
//! | `id`              | `context.id`               |
//! | `source`          | `context.source`           |
//! | `type`            | `context.type`             |
//! | `time`            | `context.timestamp`        |
//! | `specversion`     | `1.0`                      |
//! | `datacontenttype` | `application/json`         |
//! | `data`            | the whole event body       |
//!
//! Decoding resolves `type` through an [`EventRegistry`] and then requires the
//! envelope attributes to agree with `data.context`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::cdevent::{AnyCDEvent, CDEvent, EventKind};
use crate::context::Context;
use crate::custom_data::APPLICATION_JSON;
use crate::error::{CDEventError, Result};
use crate::obs;
use crate::registry::{default_registry, EventRegistry};
use crate::CLOUDEVENTS_SPEC_VERSION;

/// A CloudEvents 1.0 envelope in structured JSON mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudEvent {
    pub specversion: String,
    pub id: String,
    pub source: String,
    #[serde(rename = "type")]
    pub r#type: String,
    pub time: DateTime<Utc>,
    #[serde(default = "default_content_type")]
    pub datacontenttype: String,
    pub data: Value,
}

fn default_content_type() -> String {
    APPLICATION_JSON.to_string()
}

impl CloudEvent {
    fn for_context(context: &Context, data: Value) -> Self {
        CloudEvent {
            specversion: CLOUDEVENTS_SPEC_VERSION.to_string(),
            id: context.id().to_string(),
            source: context.source().to_string(),
            r#type: context.event_type().to_string(),
            time: context.timestamp(),
            datacontenttype: APPLICATION_JSON.to_string(),
            data,
        }
    }

    /// Parse a structured-mode JSON envelope.
    ///
    /// # Errors
    ///
    /// `MalformedPayload` when the text is not an envelope, or when its
    /// `specversion` or `datacontenttype` is not supported.
    pub fn from_json(text: &str) -> Result<Self> {
        let envelope: CloudEvent = serde_json::from_str(text)
            .map_err(|e| CDEventError::malformed(format!("invalid cloud event: {e}")))?;
        envelope.check_attributes()?;
        Ok(envelope)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn check_attributes(&self) -> Result<()> {
        if self.specversion != CLOUDEVENTS_SPEC_VERSION {
            return Err(CDEventError::malformed(format!(
                "unsupported cloud event specversion '{}'",
                self.specversion
            )));
        }
        if self.datacontenttype != APPLICATION_JSON {
            return Err(CDEventError::malformed(format!(
                "unsupported datacontenttype '{}'",
                self.datacontenttype
            )));
        }
        if !self.data.is_object() {
            return Err(CDEventError::malformed("cloud event data is not an object"));
        }
        Ok(())
    }

    fn check_agreement(&self, context: &Context) -> Result<()> {
        let mismatch = |attribute: &str| -> Result<()> {
            Err(CDEventError::malformed(format!(
                "envelope {attribute} does not match data.context"
            )))
        };
        if self.id != context.id() {
            return mismatch("id");
        }
        if self.source != context.source() {
            return mismatch("source");
        }
        if self.r#type != context.event_type() {
            return mismatch("type");
        }
        if self.time != context.timestamp() {
            return mismatch("time");
        }
        Ok(())
    }
}

/// Wrap an event in a cloud event.
pub fn to_cloud_event<K: EventKind>(event: &CDEvent<K>) -> Result<CloudEvent> {
    event.to_cloud_event()
}

/// Decode a cloud event through the process-wide registry.
pub fn from_cloud_event(envelope: &CloudEvent) -> Result<AnyCDEvent> {
    default_registry().from_cloud_event(envelope)
}

impl<K: EventKind> CDEvent<K> {
    pub fn to_cloud_event(&self) -> Result<CloudEvent> {
        let envelope = CloudEvent::for_context(self.context(), self.to_json()?);
        obs::emit_event_encoded(&envelope.r#type, &envelope.id);
        Ok(envelope)
    }

    /// Decode a cloud event that must carry an event of kind `K`.
    ///
    /// # Errors
    ///
    /// `MalformedPayload` when the envelope is of another kind, its
    /// attributes are unsupported, or its data does not match `K`.
    pub fn from_cloud_event(envelope: &CloudEvent) -> Result<Self> {
        let expected = K::event_type();
        let decoded = if envelope.r#type != expected {
            Err(CDEventError::malformed(format!(
                "cloud event type '{}' is not '{expected}'",
                envelope.r#type
            )))
        } else {
            decode_checked(envelope, CDEvent::<K>::from_json, CDEvent::<K>::context)
        };
        finish_decode(envelope, decoded)
    }
}

impl AnyCDEvent {
    pub fn to_cloud_event(&self) -> Result<CloudEvent> {
        let envelope = CloudEvent::for_context(self.context(), self.to_json()?);
        obs::emit_event_encoded(&envelope.r#type, &envelope.id);
        Ok(envelope)
    }
}

impl EventRegistry {
    /// Decode a cloud event into the class registered for its `type`.
    ///
    /// # Errors
    ///
    /// `UnknownEventType` when nothing is registered for the type string,
    /// `MalformedPayload` when the envelope or its data does not fit.
    pub fn from_cloud_event(&self, envelope: &CloudEvent) -> Result<AnyCDEvent> {
        let decoded = self.resolve(&envelope.r#type).and_then(|registration| {
            debug!(event_type = %registration.event_type(), "resolved cloud event type");
            decode_checked(
                envelope,
                |data| registration.decode(data),
                AnyCDEvent::context,
            )
        });
        finish_decode(envelope, decoded)
    }
}

fn decode_checked<T>(
    envelope: &CloudEvent,
    decode: impl FnOnce(Value) -> Result<T>,
    context: impl Fn(&T) -> &Context,
) -> Result<T> {
    envelope.check_attributes()?;
    let event = decode(envelope.data.clone())?;
    envelope.check_agreement(context(&event))?;
    Ok(event)
}

fn finish_decode<T>(envelope: &CloudEvent, decoded: Result<T>) -> Result<T> {
    match &decoded {
        Ok(_) => obs::emit_event_decoded(&envelope.r#type, &envelope.id),
        Err(e) => obs::emit_envelope_rejected(&envelope.r#type, e),
    }
    decoded
}
