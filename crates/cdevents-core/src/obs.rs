//! Structured observability hooks for event conversion and validation.
//!
//! Events are emitted at `info!` level; rejected envelopes at `warn!`.
//! Filtering follows `RUST_LOG` once [`crate::init_tracing`] is installed.

use tracing::{info, warn};

/// Emit event: an event was encoded into a cloud event.
pub fn emit_event_encoded(event_type: &str, id: &str) {
    info!(event = "cdevent.encoded", event_type = %event_type, id = %id);
}

/// Emit event: a cloud event was decoded into a typed event.
pub fn emit_event_decoded(event_type: &str, id: &str) {
    info!(event = "cdevent.decoded", event_type = %event_type, id = %id);
}

/// Emit event: an event body was checked against its schema.
pub fn emit_schema_validated(event_type: &str, violations: usize) {
    info!(
        event = "schema.validated",
        event_type = %event_type,
        violations = violations,
        valid = violations == 0,
    );
}

/// Emit event: a cloud event could not be decoded (warning level).
pub fn emit_envelope_rejected(event_type: &str, error: &dyn std::fmt::Display) {
    warn!(event = "cdevent.rejected", event_type = %event_type, error = %error);
}
