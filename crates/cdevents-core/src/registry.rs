//! Event type registry: type string → concrete event class.
//!
//! Entries are keyed by the version-agnostic `dev.cdevents.<domain>.<action>`
//! prefix. Each entry remembers the full type string it was registered with,
//! so a known domain/action with a different version still resolves to
//! `UnknownEventType`.
//!
//! The registry is populated before first use and only read afterwards; the
//! process-wide instance behind [`default_registry`] is initialized once.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde_json::Value;
use tracing::{debug, warn};

use crate::cdevent::{AnyCDEvent, CDEvent, EventFields, EventKind};
use crate::error::{CDEventError, Result};
use crate::subject::SubjectContent;
use crate::TYPE_PREFIX;

/// The parts of a type string: `dev.cdevents.<domain>.<action>.<version>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeName<'a> {
    pub domain: &'a str,
    pub action: &'a str,
    pub version: &'a str,
}

impl<'a> TypeName<'a> {
    /// Split a type string, or `None` if it does not follow the format.
    pub fn parse(event_type: &'a str) -> Option<Self> {
        let rest = event_type.strip_prefix(TYPE_PREFIX)?;
        let mut parts = rest.splitn(3, '.');
        let domain = parts.next().filter(|s| !s.is_empty())?;
        let action = parts.next().filter(|s| !s.is_empty())?;
        let version = parts.next().filter(|s| !s.is_empty())?;
        Some(TypeName {
            domain,
            action,
            version,
        })
    }

    fn key(&self) -> String {
        format!("{TYPE_PREFIX}{}.{}", self.domain, self.action)
    }
}

/// One registered event class.
#[derive(Debug, Clone)]
pub struct Registration {
    event_type: String,
    domain: &'static str,
    action: &'static str,
    subject_type: &'static str,
    decode: fn(Value) -> Result<AnyCDEvent>,
    construct: fn(EventFields, Value) -> Result<AnyCDEvent>,
}

impl Registration {
    fn of<K: EventKind>() -> Self {
        Registration {
            event_type: K::event_type(),
            domain: K::DOMAIN,
            action: K::ACTION,
            subject_type: <K::Content as SubjectContent>::SUBJECT_TYPE,
            decode: decode_as::<K>,
            construct: construct_as::<K>,
        }
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn domain(&self) -> &'static str {
        self.domain
    }

    pub fn action(&self) -> &'static str {
        self.action
    }

    /// Expected `subject.type` for events of this class.
    pub fn subject_type(&self) -> &'static str {
        self.subject_type
    }

    /// Parse an event body into this class.
    pub fn decode(&self, body: Value) -> Result<AnyCDEvent> {
        (self.decode)(body)
    }

    /// Build an event of this class with content given as JSON.
    pub fn construct(&self, fields: EventFields, content: Value) -> Result<AnyCDEvent> {
        (self.construct)(fields, content)
    }
}

fn decode_as<K: EventKind>(body: Value) -> Result<AnyCDEvent> {
    CDEvent::<K>::from_json(body).map(AnyCDEvent::from)
}

fn construct_as<K: EventKind>(fields: EventFields, content: Value) -> Result<AnyCDEvent> {
    let content = match content {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    let content: K::Content = serde_json::from_value(content).map_err(|e| {
        CDEventError::invalid_argument(format!("invalid content for {}: {e}", K::event_type()))
    })?;
    CDEvent::<K>::new(fields, content).map(AnyCDEvent::from)
}

/// Mapping from type strings to event classes.
#[derive(Debug, Clone, Default)]
pub struct EventRegistry {
    entries: BTreeMap<String, Registration>,
}

impl EventRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the whole event catalogue.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        crate::events::register_defaults(&mut registry);
        debug!(count = registry.len(), "default event registry populated");
        registry
    }

    /// Register event class `K`. A class already registered under the same
    /// domain/action is replaced.
    pub fn register<K: EventKind>(&mut self) -> &mut Self {
        let registration = Registration::of::<K>();
        let key = format!("{TYPE_PREFIX}{}.{}", K::DOMAIN, K::ACTION);
        debug!(event_type = %registration.event_type, "registering event type");
        if let Some(previous) = self.entries.insert(key, registration) {
            warn!(
                event_type = %previous.event_type,
                "event type registered twice; keeping the latest registration"
            );
        }
        self
    }

    /// Find the class registered for exactly this type string.
    ///
    /// # Errors
    ///
    /// `UnknownEventType` when the string is malformed, its domain/action is
    /// not registered, or it carries a different version.
    pub fn resolve(&self, event_type: &str) -> Result<&Registration> {
        let name =
            TypeName::parse(event_type).ok_or_else(|| CDEventError::unknown_type(event_type))?;
        match self.entries.get(&name.key()) {
            Some(registration) if registration.event_type == event_type => Ok(registration),
            _ => Err(CDEventError::unknown_type(event_type)),
        }
    }

    pub fn contains(&self, event_type: &str) -> bool {
        self.resolve(event_type).is_ok()
    }

    /// Registered type strings, sorted.
    pub fn event_types(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(|r| r.event_type.as_str())
    }

    pub fn registrations(&self) -> impl Iterator<Item = &Registration> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse an event body as the class registered for `event_type`.
    pub fn decode(&self, event_type: &str, body: Value) -> Result<AnyCDEvent> {
        self.resolve(event_type)?.decode(body)
    }

    /// Build an event of the class registered for `event_type`.
    pub fn construct(
        &self,
        event_type: &str,
        fields: EventFields,
        content: Value,
    ) -> Result<AnyCDEvent> {
        self.resolve(event_type)?.construct(fields, content)
    }
}

static DEFAULT_REGISTRY: OnceLock<EventRegistry> = OnceLock::new();

/// Process-wide registry holding the event catalogue.
pub fn default_registry() -> &'static EventRegistry {
    DEFAULT_REGISTRY.get_or_init(EventRegistry::with_defaults)
}
