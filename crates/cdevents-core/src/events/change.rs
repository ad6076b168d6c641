//! Events under `dev.cdevents.change` (pull/merge requests and similar).

use serde::{Deserialize, Serialize};

use crate::cdevent::{CDEvent, EventFields};
use crate::error::Result;
use crate::subject::{Reference, SubjectContent};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<Reference>,
}

impl SubjectContent for ChangeContent {
    const SUBJECT_TYPE: &'static str = "change";

    fn validate(&self) -> Result<()> {
        match &self.repository {
            Some(repository) => repository.validate("repository"),
            None => Ok(()),
        }
    }
}

event_kind!(ChangeCreated, "change", "created", ChangeContent);
event_kind!(ChangeUpdated, "change", "updated", ChangeContent);
event_kind!(ChangeReviewed, "change", "reviewed", ChangeContent);
event_kind!(ChangeMerged, "change", "merged", ChangeContent);
event_kind!(ChangeAbandoned, "change", "abandoned", ChangeContent);

pub type ChangeCreatedEvent = CDEvent<ChangeCreated>;
pub type ChangeUpdatedEvent = CDEvent<ChangeUpdated>;
pub type ChangeReviewedEvent = CDEvent<ChangeReviewed>;
pub type ChangeMergedEvent = CDEvent<ChangeMerged>;
pub type ChangeAbandonedEvent = CDEvent<ChangeAbandoned>;

pub fn new_change_created_event(
    fields: EventFields,
    repository: Option<Reference>,
) -> Result<ChangeCreatedEvent> {
    CDEvent::new(fields, ChangeContent { repository })
}

pub fn new_change_updated_event(
    fields: EventFields,
    repository: Option<Reference>,
) -> Result<ChangeUpdatedEvent> {
    CDEvent::new(fields, ChangeContent { repository })
}

pub fn new_change_reviewed_event(
    fields: EventFields,
    repository: Option<Reference>,
) -> Result<ChangeReviewedEvent> {
    CDEvent::new(fields, ChangeContent { repository })
}

pub fn new_change_merged_event(
    fields: EventFields,
    repository: Option<Reference>,
) -> Result<ChangeMergedEvent> {
    CDEvent::new(fields, ChangeContent { repository })
}

pub fn new_change_abandoned_event(
    fields: EventFields,
    repository: Option<Reference>,
) -> Result<ChangeAbandonedEvent> {
    CDEvent::new(fields, ChangeContent { repository })
}
