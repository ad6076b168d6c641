//! Events under `dev.cdevents.artifact`.
//!
//! Artifact subject ids are expected to be PURLs (`pkg:oci/app@sha256:...`).

use serde::{Deserialize, Serialize};

use crate::cdevent::{CDEvent, EventFields};
use crate::error::Result;
use crate::subject::{Reference, SubjectContent};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactPackagedContent {
    /// The change the artifact was built from.
    pub change: Reference,
}

impl SubjectContent for ArtifactPackagedContent {
    const SUBJECT_TYPE: &'static str = "artifact";

    fn validate(&self) -> Result<()> {
        self.change.validate("change")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactContent {}

impl SubjectContent for ArtifactContent {
    const SUBJECT_TYPE: &'static str = "artifact";
}

event_kind!(
    /// An artifact was packaged from a change.
    ArtifactPackaged, "artifact", "packaged", ArtifactPackagedContent
);
event_kind!(
    /// An artifact was published to a registry.
    ArtifactPublished, "artifact", "published", ArtifactContent
);

pub type ArtifactPackagedEvent = CDEvent<ArtifactPackaged>;
pub type ArtifactPublishedEvent = CDEvent<ArtifactPublished>;

pub fn new_artifact_packaged_event(
    fields: EventFields,
    change: Reference,
) -> Result<ArtifactPackagedEvent> {
    CDEvent::new(fields, ArtifactPackagedContent { change })
}

pub fn new_artifact_published_event(fields: EventFields) -> Result<ArtifactPublishedEvent> {
    CDEvent::new(fields, ArtifactContent::default())
}
