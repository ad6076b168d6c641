//! Context: the metadata block every CDEvent carries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{require_non_empty, Result};

/// Identity, type and timing of a single event occurrence.
///
/// Built once by [`crate::CDEvent::new`]; there are no setters. `event_type`
/// and `version` always agree on the spec version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Context {
    version: String,
    id: String,
    source: String,
    #[serde(rename = "type")]
    event_type: String,
    timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    chain_id: Option<String>,
}

impl Context {
    pub(crate) fn new(
        event_type: String,
        version: &str,
        id: String,
        source: String,
        timestamp: DateTime<Utc>,
        chain_id: Option<String>,
    ) -> Result<Self> {
        require_non_empty("context id", &id)?;
        require_non_empty("context source", &source)?;
        if let Some(chain_id) = &chain_id {
            require_non_empty("context chain id", chain_id)?;
        }

        Ok(Context {
            version: version.to_string(),
            id,
            source,
            event_type,
            timestamp,
            chain_id,
        })
    }

    /// Spec version, e.g. `0.3.0`.
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// URI-like reference to the producing system.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Full type string, e.g. `dev.cdevents.build.finished.0.3.0`.
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// When the event occurred.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Id of a causally related earlier event, if any.
    pub fn chain_id(&self) -> Option<&str> {
        self.chain_id.as_deref()
    }
}
