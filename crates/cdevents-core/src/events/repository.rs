//! Events under `dev.cdevents.repository`.

use serde::{Deserialize, Serialize};

use crate::cdevent::{CDEvent, EventFields};
use crate::error::{require_non_empty, Result};
use crate::subject::SubjectContent;

/// Content for a newly created repository; `name` and `url` are required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryCreatedContent {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_url: Option<String>,
}

impl RepositoryCreatedContent {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        RepositoryCreatedContent {
            name: name.into(),
            owner: None,
            url: url.into(),
            view_url: None,
        }
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn with_view_url(mut self, view_url: impl Into<String>) -> Self {
        self.view_url = Some(view_url.into());
        self
    }
}

impl SubjectContent for RepositoryCreatedContent {
    const SUBJECT_TYPE: &'static str = "repository";

    fn validate(&self) -> Result<()> {
        require_non_empty("repository name", &self.name)?;
        require_non_empty("repository url", &self.url)
    }
}

/// Content for modified or deleted repositories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_url: Option<String>,
}

impl SubjectContent for RepositoryContent {
    const SUBJECT_TYPE: &'static str = "repository";
}

event_kind!(
    /// A source repository was created.
    RepositoryCreated, "repository", "created", RepositoryCreatedContent
);
event_kind!(RepositoryModified, "repository", "modified", RepositoryContent);
event_kind!(RepositoryDeleted, "repository", "deleted", RepositoryContent);

pub type RepositoryCreatedEvent = CDEvent<RepositoryCreated>;
pub type RepositoryModifiedEvent = CDEvent<RepositoryModified>;
pub type RepositoryDeletedEvent = CDEvent<RepositoryDeleted>;

pub fn new_repository_created_event(
    fields: EventFields,
    content: RepositoryCreatedContent,
) -> Result<RepositoryCreatedEvent> {
    CDEvent::new(fields, content)
}

pub fn new_repository_modified_event(
    fields: EventFields,
    content: RepositoryContent,
) -> Result<RepositoryModifiedEvent> {
    CDEvent::new(fields, content)
}

pub fn new_repository_deleted_event(
    fields: EventFields,
    content: RepositoryContent,
) -> Result<RepositoryDeletedEvent> {
    CDEvent::new(fields, content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_repository_created_requires_url() {
        let fields = EventFields::new("ctx", "/scm", Utc::now(), "repo-1");
        let content = RepositoryCreatedContent::new("cdevents", "");
        assert!(new_repository_created_event(fields, content).is_err());
    }

    #[test]
    fn test_repository_created_wire_names() {
        let fields = EventFields::new("ctx", "/scm", Utc::now(), "repo-1");
        let content = RepositoryCreatedContent::new("cdevents", "https://example.org/cdevents")
            .with_view_url("https://example.org/cdevents/view");
        let json = new_repository_created_event(fields, content)
            .unwrap()
            .to_json()
            .unwrap();
        assert_eq!(
            json["subject"]["content"]["viewUrl"],
            "https://example.org/cdevents/view"
        );
        assert!(json["subject"]["content"].get("owner").is_none());
    }
}
