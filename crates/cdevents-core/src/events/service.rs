//! Events under `dev.cdevents.service`: a running instance of an artifact in
//! an environment.

use serde::{Deserialize, Serialize};

use crate::cdevent::{CDEvent, EventFields};
use crate::error::{require_non_empty, Result};
use crate::subject::{Reference, SubjectContent};

/// Content for deployments, upgrades and rollbacks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDeploymentContent {
    pub environment: Reference,
    /// PURL of the artifact now running.
    pub artifact_id: String,
}

impl ServiceDeploymentContent {
    pub fn new(environment: Reference, artifact_id: impl Into<String>) -> Self {
        ServiceDeploymentContent {
            environment,
            artifact_id: artifact_id.into(),
        }
    }
}

impl SubjectContent for ServiceDeploymentContent {
    const SUBJECT_TYPE: &'static str = "service";

    fn validate(&self) -> Result<()> {
        self.environment.validate("environment")?;
        require_non_empty("artifact id", &self.artifact_id)
    }
}

/// Content for removed or published services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceContent {
    pub environment: Reference,
}

impl SubjectContent for ServiceContent {
    const SUBJECT_TYPE: &'static str = "service";

    fn validate(&self) -> Result<()> {
        self.environment.validate("environment")
    }
}

event_kind!(ServiceDeployed, "service", "deployed", ServiceDeploymentContent);
event_kind!(ServiceUpgraded, "service", "upgraded", ServiceDeploymentContent);
event_kind!(ServiceRolledback, "service", "rolledback", ServiceDeploymentContent);
event_kind!(ServiceRemoved, "service", "removed", ServiceContent);
event_kind!(ServicePublished, "service", "published", ServiceContent);

pub type ServiceDeployedEvent = CDEvent<ServiceDeployed>;
pub type ServiceUpgradedEvent = CDEvent<ServiceUpgraded>;
pub type ServiceRolledbackEvent = CDEvent<ServiceRolledback>;
pub type ServiceRemovedEvent = CDEvent<ServiceRemoved>;
pub type ServicePublishedEvent = CDEvent<ServicePublished>;

pub fn new_service_deployed_event(
    fields: EventFields,
    environment: Reference,
    artifact_id: impl Into<String>,
) -> Result<ServiceDeployedEvent> {
    CDEvent::new(fields, ServiceDeploymentContent::new(environment, artifact_id))
}

pub fn new_service_upgraded_event(
    fields: EventFields,
    environment: Reference,
    artifact_id: impl Into<String>,
) -> Result<ServiceUpgradedEvent> {
    CDEvent::new(fields, ServiceDeploymentContent::new(environment, artifact_id))
}

pub fn new_service_rolledback_event(
    fields: EventFields,
    environment: Reference,
    artifact_id: impl Into<String>,
) -> Result<ServiceRolledbackEvent> {
    CDEvent::new(fields, ServiceDeploymentContent::new(environment, artifact_id))
}

pub fn new_service_removed_event(
    fields: EventFields,
    environment: Reference,
) -> Result<ServiceRemovedEvent> {
    CDEvent::new(fields, ServiceContent { environment })
}

pub fn new_service_published_event(
    fields: EventFields,
    environment: Reference,
) -> Result<ServicePublishedEvent> {
    CDEvent::new(fields, ServiceContent { environment })
}
