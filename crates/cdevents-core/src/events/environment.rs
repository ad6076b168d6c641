//! Events under `dev.cdevents.environment`.

use serde::{Deserialize, Serialize};

use crate::cdevent::{CDEvent, EventFields};
use crate::error::Result;
use crate::subject::SubjectContent;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl SubjectContent for EnvironmentContent {
    const SUBJECT_TYPE: &'static str = "environment";
}

event_kind!(EnvironmentCreated, "environment", "created", EnvironmentContent);
event_kind!(EnvironmentModified, "environment", "modified", EnvironmentContent);
event_kind!(EnvironmentDeleted, "environment", "deleted", EnvironmentContent);

pub type EnvironmentCreatedEvent = CDEvent<EnvironmentCreated>;
pub type EnvironmentModifiedEvent = CDEvent<EnvironmentModified>;
pub type EnvironmentDeletedEvent = CDEvent<EnvironmentDeleted>;

pub fn new_environment_created_event(
    fields: EventFields,
    content: EnvironmentContent,
) -> Result<EnvironmentCreatedEvent> {
    CDEvent::new(fields, content)
}

pub fn new_environment_modified_event(
    fields: EventFields,
    content: EnvironmentContent,
) -> Result<EnvironmentModifiedEvent> {
    CDEvent::new(fields, content)
}

pub fn new_environment_deleted_event(
    fields: EventFields,
    content: EnvironmentContent,
) -> Result<EnvironmentDeletedEvent> {
    CDEvent::new(fields, content)
}
