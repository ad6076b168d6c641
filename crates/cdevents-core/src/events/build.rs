//! Events under `dev.cdevents.build`.

use serde::{Deserialize, Serialize};

use crate::cdevent::{CDEvent, EventFields};
use crate::error::{require_non_empty, Result};
use crate::subject::SubjectContent;

/// Content for build subjects that carry no extra data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildContent {}

impl SubjectContent for BuildContent {
    const SUBJECT_TYPE: &'static str = "build";
}

/// Content for a finished build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildFinishedContent {
    /// PURL of the artifact produced by the build.
    pub artifact_id: String,
}

impl BuildFinishedContent {
    pub fn new(artifact_id: impl Into<String>) -> Self {
        BuildFinishedContent {
            artifact_id: artifact_id.into(),
        }
    }
}

impl SubjectContent for BuildFinishedContent {
    const SUBJECT_TYPE: &'static str = "build";

    fn validate(&self) -> Result<()> {
        require_non_empty("artifact id", &self.artifact_id)
    }
}

event_kind!(
    /// A build was queued.
    BuildQueued, "build", "queued", BuildContent
);
event_kind!(
    /// A build started.
    BuildStarted, "build", "started", BuildContent
);
event_kind!(
    /// A build finished and produced an artifact.
    BuildFinished, "build", "finished", BuildFinishedContent
);

pub type BuildQueuedEvent = CDEvent<BuildQueued>;
pub type BuildStartedEvent = CDEvent<BuildStarted>;
pub type BuildFinishedEvent = CDEvent<BuildFinished>;

pub fn new_build_queued_event(fields: EventFields) -> Result<BuildQueuedEvent> {
    CDEvent::new(fields, BuildContent::default())
}

pub fn new_build_started_event(fields: EventFields) -> Result<BuildStartedEvent> {
    CDEvent::new(fields, BuildContent::default())
}

pub fn new_build_finished_event(
    fields: EventFields,
    artifact_id: impl Into<String>,
) -> Result<BuildFinishedEvent> {
    CDEvent::new(fields, BuildFinishedContent::new(artifact_id))
}
