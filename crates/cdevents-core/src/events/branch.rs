//! Events under `dev.cdevents.branch`.

use serde::{Deserialize, Serialize};

use crate::cdevent::{CDEvent, EventFields};
use crate::error::Result;
use crate::subject::{Reference, SubjectContent};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchContent {
    /// Repository the branch lives in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<Reference>,
}

impl SubjectContent for BranchContent {
    const SUBJECT_TYPE: &'static str = "branch";

    fn validate(&self) -> Result<()> {
        match &self.repository {
            Some(repository) => repository.validate("repository"),
            None => Ok(()),
        }
    }
}

event_kind!(BranchCreated, "branch", "created", BranchContent);
event_kind!(BranchDeleted, "branch", "deleted", BranchContent);

pub type BranchCreatedEvent = CDEvent<BranchCreated>;
pub type BranchDeletedEvent = CDEvent<BranchDeleted>;

pub fn new_branch_created_event(
    fields: EventFields,
    repository: Option<Reference>,
) -> Result<BranchCreatedEvent> {
    CDEvent::new(fields, BranchContent { repository })
}

pub fn new_branch_deleted_event(
    fields: EventFields,
    repository: Option<Reference>,
) -> Result<BranchDeletedEvent> {
    CDEvent::new(fields, BranchContent { repository })
}
