//! Event catalogue: one module per CDEvents domain.
//!
//! Each event class is a zero-sized marker implementing [`crate::EventKind`]; the
//! `CDEvent<Marker>` alias (e.g. [`BuildFinishedEvent`]) is the event itself.
//! Adding a domain means adding a module and a line in [`register_defaults`];
//! nothing else changes.

use crate::registry::EventRegistry;

/// Declare a marker type bound to one domain/action and one content type.
macro_rules! event_kind {
    ($(#[$meta:meta])* $name:ident, $domain:literal, $action:literal, $content:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub struct $name;

        impl $crate::cdevent::EventKind for $name {
            const DOMAIN: &'static str = $domain;
            const ACTION: &'static str = $action;
            type Content = $content;
        }
    };
}

pub mod artifact;
pub mod branch;
pub mod build;
pub mod change;
pub mod environment;
pub mod pipelinerun;
pub mod repository;
pub mod service;
pub mod taskrun;
pub mod testcaserun;

pub use artifact::*;
pub use branch::*;
pub use build::*;
pub use change::*;
pub use environment::*;
pub use pipelinerun::*;
pub use repository::*;
pub use service::*;
pub use taskrun::*;
pub use testcaserun::*;

/// Register every event class in the catalogue.
pub fn register_defaults(registry: &mut EventRegistry) {
    registry
        .register::<RepositoryCreated>()
        .register::<RepositoryModified>()
        .register::<RepositoryDeleted>()
        .register::<BranchCreated>()
        .register::<BranchDeleted>()
        .register::<ChangeCreated>()
        .register::<ChangeUpdated>()
        .register::<ChangeReviewed>()
        .register::<ChangeMerged>()
        .register::<ChangeAbandoned>()
        .register::<BuildQueued>()
        .register::<BuildStarted>()
        .register::<BuildFinished>()
        .register::<TestCaseRunQueued>()
        .register::<TestCaseRunStarted>()
        .register::<TestCaseRunFinished>()
        .register::<PipelineRunQueued>()
        .register::<PipelineRunStarted>()
        .register::<PipelineRunFinished>()
        .register::<TaskRunStarted>()
        .register::<TaskRunFinished>()
        .register::<ArtifactPackaged>()
        .register::<ArtifactPublished>()
        .register::<EnvironmentCreated>()
        .register::<EnvironmentModified>()
        .register::<EnvironmentDeleted>()
        .register::<ServiceDeployed>()
        .register::<ServiceUpgraded>()
        .register::<ServiceRolledback>()
        .register::<ServiceRemoved>()
        .register::<ServicePublished>();
}
