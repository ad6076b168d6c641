//! CDEvents for Rust
//!
//! Typed continuous-delivery events and their CloudEvents binding:
//! - Context: identity, type, spec version and timestamp of an occurrence
//! - Subject: what the event is about, one content shape per domain
//! - CDEvent<K>: context + subject + optional custom data, fixed to one kind K
//! - CloudEvent: the transport envelope, with typed and registry-driven decoding
//! - SchemaRegistry: JSON Schema validation keyed by event type
//! - EventRegistry: type string → event class, open to new domains
//!
//! Events are immutable once built. The registries are populated once and
//! only read afterwards, so events can be built and converted from any thread.

pub mod cdevent;
pub mod cloudevent;
pub mod context;
pub mod custom_data;
pub mod error;
pub mod events;
pub mod obs;
pub mod registry;
pub mod schema;
pub mod subject;
pub mod telemetry;

pub use cdevent::{event_type_for, AnyCDEvent, CDEvent, EventFields, EventKind};
pub use cloudevent::{from_cloud_event, to_cloud_event, CloudEvent};
pub use context::Context;
pub use custom_data::{CustomData, APPLICATION_JSON};
pub use error::{CDEventError, Result};
pub use registry::{default_registry, EventRegistry, Registration, TypeName};
pub use schema::{
    schema_key, BundledSchemas, DirectorySchemaSource, SchemaRegistry, SchemaSource,
    SchemaViolation, ValidationReport,
};
pub use subject::{Reference, Subject, SubjectContent};
pub use telemetry::init_tracing;

/// CDEvents specification version carried in `context.version` and as the
/// last segment of every type string.
pub const SPEC_VERSION: &str = "0.3.0";

/// CloudEvents specification version of the envelope.
pub const CLOUDEVENTS_SPEC_VERSION: &str = "1.0";

/// Prefix shared by every CDEvents type string.
pub const TYPE_PREFIX: &str = "dev.cdevents.";

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
