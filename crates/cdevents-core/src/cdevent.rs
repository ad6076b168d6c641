//! The base event: a [`Context`] plus a typed [`Subject`] plus custom data.
//!
//! Every concrete event class is a marker type implementing [`EventKind`].
//! The marker fixes the domain/action (and therefore `context.type`) and the
//! subject content type, so a `CDEvent<K>` cannot pair a context type with the
//! wrong subject variant.

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;

use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use tracing::debug;

use crate::context::Context;
use crate::custom_data::CustomData;
use crate::error::{require_non_empty, CDEventError, Result};
use crate::subject::{into_malformed, RawSubject, Subject, SubjectContent};
use crate::{SPEC_VERSION, TYPE_PREFIX};

/// Capabilities shared by every concrete event class.
pub trait EventKind: Send + Sync + 'static {
    /// Domain segment of the type string, e.g. `build`.
    const DOMAIN: &'static str;
    /// Action segment of the type string, e.g. `finished`.
    const ACTION: &'static str;
    /// Subject content carried by this event.
    type Content: SubjectContent;

    /// Full type string for the active spec version.
    fn event_type() -> String {
        event_type_for(Self::DOMAIN, Self::ACTION)
    }
}

/// `dev.cdevents.<domain>.<action>.<spec version>`
pub fn event_type_for(domain: &str, action: &str) -> String {
    format!("{TYPE_PREFIX}{domain}.{action}.{SPEC_VERSION}")
}

/// Caller-supplied fields common to every event constructor.
#[derive(Debug, Clone, PartialEq)]
pub struct EventFields {
    pub id: String,
    pub source: String,
    pub timestamp: DateTime<Utc>,
    pub subject_id: String,
    pub subject_source: Option<String>,
    pub chain_id: Option<String>,
    pub custom_data: Option<CustomData>,
    pub custom_data_content_type: Option<String>,
}

impl EventFields {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        timestamp: DateTime<Utc>,
        subject_id: impl Into<String>,
    ) -> Self {
        EventFields {
            id: id.into(),
            source: source.into(),
            timestamp,
            subject_id: subject_id.into(),
            subject_source: None,
            chain_id: None,
            custom_data: None,
            custom_data_content_type: None,
        }
    }

    /// Subject source; defaults to the context source when not set.
    pub fn with_subject_source(mut self, source: impl Into<String>) -> Self {
        self.subject_source = Some(source.into());
        self
    }

    /// Id of the event that caused this one.
    pub fn with_chain_id(mut self, chain_id: impl Into<String>) -> Self {
        self.chain_id = Some(chain_id.into());
        self
    }

    pub fn with_custom_data(mut self, data: impl Into<CustomData>) -> Self {
        self.custom_data = Some(data.into());
        self
    }

    pub fn with_custom_data_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.custom_data_content_type = Some(content_type.into());
        self
    }
}

/// A CDEvent of a concrete kind `K`. Immutable once built.
pub struct CDEvent<K: EventKind> {
    context: Context,
    subject: Subject<K::Content>,
    custom_data: Option<CustomData>,
    custom_data_content_type: Option<String>,
    kind: PhantomData<fn() -> K>,
}

impl<K: EventKind> CDEvent<K> {
    /// Build an event of kind `K`.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when an identifier is empty, the content is invalid,
    /// or custom data is given without a content type.
    pub fn new(fields: EventFields, content: K::Content) -> Result<Self> {
        let EventFields {
            id,
            source,
            timestamp,
            subject_id,
            subject_source,
            chain_id,
            custom_data,
            custom_data_content_type,
        } = fields;

        let custom_data_content_type = match (&custom_data, custom_data_content_type) {
            (Some(_), Some(content_type)) => {
                require_non_empty("custom data content type", &content_type)?;
                Some(content_type)
            }
            (Some(_), None) => {
                return Err(CDEventError::invalid_argument(
                    "custom data requires a custom data content type",
                ));
            }
            (None, _) => None,
        };

        let context = Context::new(K::event_type(), SPEC_VERSION, id, source, timestamp, chain_id)?;
        let subject_source = subject_source.unwrap_or_else(|| context.source().to_string());
        let subject = Subject::new(subject_id, subject_source, content)?;

        debug!(event_type = %context.event_type(), id = %context.id(), "cdevent constructed");

        Ok(CDEvent {
            context,
            subject,
            custom_data,
            custom_data_content_type,
            kind: PhantomData,
        })
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn subject(&self) -> &Subject<K::Content> {
        &self.subject
    }

    pub fn custom_data(&self) -> Option<&CustomData> {
        self.custom_data.as_ref()
    }

    pub fn custom_data_content_type(&self) -> Option<&str> {
        self.custom_data_content_type.as_deref()
    }

    pub fn event_type(&self) -> &str {
        self.context.event_type()
    }

    /// Serialize the event body (`context`, `subject`, `customData`, ...).
    pub fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Parse an event body, checking it against kind `K`.
    ///
    /// # Errors
    ///
    /// `MalformedPayload` when the body does not have the shape of `K`.
    pub fn from_json(body: Value) -> Result<Self> {
        let body: EventBody = serde_json::from_value(body)
            .map_err(|e| CDEventError::malformed(format!("invalid event body: {e}")))?;
        Self::from_body(body)
    }

    fn from_body(body: EventBody) -> Result<Self> {
        let expected = K::event_type();
        if body.context.event_type() != expected {
            return Err(CDEventError::malformed(format!(
                "context type '{}' does not match expected '{expected}'",
                body.context.event_type()
            )));
        }
        if body.context.version() != SPEC_VERSION {
            return Err(CDEventError::malformed(format!(
                "context version '{}' does not match spec version '{SPEC_VERSION}'",
                body.context.version()
            )));
        }
        require_non_empty("context id", body.context.id()).map_err(into_malformed)?;
        require_non_empty("context source", body.context.source()).map_err(into_malformed)?;
        if let Some(chain_id) = body.context.chain_id() {
            require_non_empty("context chain id", chain_id).map_err(into_malformed)?;
        }

        let subject = body.subject.resolve::<K::Content>(body.context.source())?;

        let custom_data_content_type = match (&body.custom_data, body.custom_data_content_type) {
            (Some(_), Some(content_type)) if !content_type.trim().is_empty() => Some(content_type),
            (Some(_), _) => {
                return Err(CDEventError::malformed(
                    "customData present without customDataContentType",
                ));
            }
            (None, _) => None,
        };

        Ok(CDEvent {
            context: body.context,
            subject,
            custom_data: body.custom_data,
            custom_data_content_type,
            kind: PhantomData,
        })
    }
}

impl<K: EventKind> Clone for CDEvent<K> {
    fn clone(&self) -> Self {
        CDEvent {
            context: self.context.clone(),
            subject: self.subject.clone(),
            custom_data: self.custom_data.clone(),
            custom_data_content_type: self.custom_data_content_type.clone(),
            kind: PhantomData,
        }
    }
}

impl<K: EventKind> PartialEq for CDEvent<K> {
    fn eq(&self, other: &Self) -> bool {
        self.context == other.context
            && self.subject == other.subject
            && self.custom_data == other.custom_data
            && self.custom_data_content_type == other.custom_data_content_type
    }
}

impl<K: EventKind> fmt::Debug for CDEvent<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CDEvent")
            .field("context", &self.context)
            .field("subject", &self.subject)
            .field("custom_data", &self.custom_data)
            .field("custom_data_content_type", &self.custom_data_content_type)
            .finish()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EventBodyRef<'a, C: SubjectContent> {
    context: &'a Context,
    subject: &'a Subject<C>,
    #[serde(skip_serializing_if = "Option::is_none")]
    custom_data: Option<&'a CustomData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    custom_data_content_type: Option<&'a str>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventBody {
    context: Context,
    subject: RawSubject,
    #[serde(default)]
    custom_data: Option<CustomData>,
    #[serde(default)]
    custom_data_content_type: Option<String>,
}

impl<K: EventKind> Serialize for CDEvent<K> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        EventBodyRef {
            context: &self.context,
            subject: &self.subject,
            custom_data: self.custom_data.as_ref(),
            custom_data_content_type: self.custom_data_content_type.as_deref(),
        }
        .serialize(serializer)
    }
}

impl<'de, K: EventKind> Deserialize<'de> for CDEvent<K> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let body = EventBody::deserialize(deserializer)?;
        Self::from_body(body).map_err(D::Error::custom)
    }
}

// ============================================================================
// TYPE-ERASED EVENTS
// ============================================================================

trait ErasedEvent: Send + Sync {
    fn context(&self) -> &Context;
    fn subject_id(&self) -> &str;
    fn subject_source(&self) -> &str;
    fn subject_type(&self) -> &'static str;
    fn custom_data(&self) -> Option<&CustomData>;
    fn custom_data_content_type(&self) -> Option<&str>;
    fn to_json(&self) -> Result<Value>;
    fn as_any(&self) -> &dyn Any;
    fn clone_box(&self) -> Box<dyn ErasedEvent>;
    fn eq_dyn(&self, other: &dyn ErasedEvent) -> bool;
    fn fmt_dyn(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

impl<K: EventKind> ErasedEvent for CDEvent<K> {
    fn context(&self) -> &Context {
        &self.context
    }

    fn subject_id(&self) -> &str {
        self.subject.id()
    }

    fn subject_source(&self) -> &str {
        self.subject.source()
    }

    fn subject_type(&self) -> &'static str {
        self.subject.subject_type()
    }

    fn custom_data(&self) -> Option<&CustomData> {
        self.custom_data.as_ref()
    }

    fn custom_data_content_type(&self) -> Option<&str> {
        self.custom_data_content_type.as_deref()
    }

    fn to_json(&self) -> Result<Value> {
        CDEvent::<K>::to_json(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn clone_box(&self) -> Box<dyn ErasedEvent> {
        Box::new(self.clone())
    }

    fn eq_dyn(&self, other: &dyn ErasedEvent) -> bool {
        other
            .as_any()
            .downcast_ref::<CDEvent<K>>()
            .is_some_and(|other| self == other)
    }

    fn fmt_dyn(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// An event whose concrete kind is only known at runtime, as produced by the
/// registry when decoding envelopes.
pub struct AnyCDEvent {
    inner: Box<dyn ErasedEvent>,
}

impl AnyCDEvent {
    pub fn event_type(&self) -> &str {
        self.inner.context().event_type()
    }

    pub fn context(&self) -> &Context {
        self.inner.context()
    }

    pub fn subject_id(&self) -> &str {
        self.inner.subject_id()
    }

    pub fn subject_source(&self) -> &str {
        self.inner.subject_source()
    }

    pub fn subject_type(&self) -> &'static str {
        self.inner.subject_type()
    }

    pub fn custom_data(&self) -> Option<&CustomData> {
        self.inner.custom_data()
    }

    pub fn custom_data_content_type(&self) -> Option<&str> {
        self.inner.custom_data_content_type()
    }

    pub fn to_json(&self) -> Result<Value> {
        self.inner.to_json()
    }

    /// Is this an event of kind `K`?
    pub fn is<K: EventKind>(&self) -> bool {
        self.inner.as_any().is::<CDEvent<K>>()
    }

    pub fn downcast_ref<K: EventKind>(&self) -> Option<&CDEvent<K>> {
        self.inner.as_any().downcast_ref::<CDEvent<K>>()
    }

    /// Recover the typed event, or get `self` back if it is another kind.
    pub fn downcast<K: EventKind>(self) -> std::result::Result<CDEvent<K>, AnyCDEvent> {
        match self.downcast_ref::<K>() {
            Some(event) => Ok(event.clone()),
            None => Err(self),
        }
    }
}

impl<K: EventKind> From<CDEvent<K>> for AnyCDEvent {
    fn from(event: CDEvent<K>) -> Self {
        AnyCDEvent {
            inner: Box::new(event),
        }
    }
}

impl Clone for AnyCDEvent {
    fn clone(&self) -> Self {
        AnyCDEvent {
            inner: self.inner.clone_box(),
        }
    }
}

impl PartialEq for AnyCDEvent {
    fn eq(&self, other: &Self) -> bool {
        self.inner.eq_dyn(other.inner.as_ref())
    }
}

impl fmt::Debug for AnyCDEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.fmt_dyn(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{BuildFinished, BuildFinishedContent, BuildQueued, BuildStarted};
    use chrono::TimeZone;
    use serde_json::json;

    fn fields() -> EventFields {
        EventFields::new(
            "CONTEXT_ID",
            "CONTEXT_SOURCE",
            Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap(),
            "SUBJECT_ID",
        )
    }

    fn build_finished(fields: EventFields) -> Result<CDEvent<BuildFinished>> {
        CDEvent::new(fields, BuildFinishedContent::new("pkg:generic/foo@1.0"))
    }

    #[test]
    fn test_type_string_ends_with_spec_version() {
        let event = build_finished(fields()).unwrap();
        assert_eq!(event.event_type(), "dev.cdevents.build.finished.0.3.0");
        assert!(event.context().event_type().ends_with(SPEC_VERSION));
        assert_eq!(event.context().version(), SPEC_VERSION);
    }

    #[test]
    fn test_subject_source_defaults_to_context_source() {
        let event = build_finished(fields()).unwrap();
        assert_eq!(event.subject().source(), "CONTEXT_SOURCE");

        let event = build_finished(fields().with_subject_source("SUBJECT_SOURCE")).unwrap();
        assert_eq!(event.subject().source(), "SUBJECT_SOURCE");
    }

    #[test]
    fn test_custom_data_requires_content_type() {
        let result = build_finished(fields().with_custom_data("raw"));
        assert!(matches!(result, Err(CDEventError::InvalidArgument(_))));
    }

    #[test]
    fn test_content_type_without_custom_data_is_dropped() {
        let event = build_finished(fields().with_custom_data_content_type("text/plain")).unwrap();
        assert!(event.custom_data().is_none());
        assert!(event.custom_data_content_type().is_none());
    }

    #[test]
    fn test_body_wire_names() {
        let event = build_finished(
            fields()
                .with_custom_data("hello")
                .with_custom_data_content_type("text/plain"),
        )
        .unwrap();
        let json = event.to_json().unwrap();

        assert_eq!(json["subject"]["type"], "build");
        assert_eq!(json["subject"]["content"]["artifactId"], "pkg:generic/foo@1.0");
        assert_eq!(json["customData"], "hello");
        assert_eq!(json["customDataContentType"], "text/plain");
    }

    #[test]
    fn test_body_roundtrip() {
        let event = build_finished(fields().with_chain_id("UPSTREAM_ID")).unwrap();
        let back = CDEvent::<BuildFinished>::from_json(event.to_json().unwrap()).unwrap();
        assert_eq!(event, back);
    }

    #[test]
    fn test_from_json_rejects_other_kind() {
        let queued = CDEvent::<BuildQueued>::new(fields(), Default::default()).unwrap();
        let result = CDEvent::<BuildStarted>::from_json(queued.to_json().unwrap());
        assert!(matches!(result, Err(CDEventError::MalformedPayload(_))));
    }

    #[test]
    fn test_from_json_rejects_custom_data_without_content_type() {
        let mut body = build_finished(fields()).unwrap().to_json().unwrap();
        body["customData"] = json!({"hello": "world"});
        let result = CDEvent::<BuildFinished>::from_json(body);
        assert!(matches!(result, Err(CDEventError::MalformedPayload(_))));
    }

    #[test]
    fn test_any_event_downcast() {
        let event = build_finished(fields()).unwrap();
        let any = AnyCDEvent::from(event.clone());

        assert!(any.is::<BuildFinished>());
        assert!(!any.is::<BuildQueued>());
        assert_eq!(any.subject_type(), "build");
        assert_eq!(any.downcast_ref::<BuildFinished>(), Some(&event));

        let any = any.downcast::<BuildQueued>().unwrap_err();
        assert_eq!(any.downcast::<BuildFinished>().unwrap(), event);
    }

    #[test]
    fn test_any_event_equality() {
        let a = AnyCDEvent::from(build_finished(fields()).unwrap());
        let b = AnyCDEvent::from(build_finished(fields()).unwrap());
        let c = AnyCDEvent::from(CDEvent::<BuildQueued>::new(fields(), Default::default()).unwrap());
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
