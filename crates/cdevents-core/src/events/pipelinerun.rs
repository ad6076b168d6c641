//! Events under `dev.cdevents.pipelinerun`.

use serde::{Deserialize, Serialize};

use crate::cdevent::{CDEvent, EventFields};
use crate::error::Result;
use crate::subject::SubjectContent;

/// How a pipeline or task run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunOutcome {
    Success,
    Error,
    Failure,
}

impl std::fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunOutcome::Success => write!(f, "success"),
            RunOutcome::Error => write!(f, "error"),
            RunOutcome::Failure => write!(f, "failure"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineRunContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl SubjectContent for PipelineRunContent {
    const SUBJECT_TYPE: &'static str = "pipelineRun";
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineRunFinishedContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<RunOutcome>,
    /// Free-text error summary when the run did not succeed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<String>,
}

impl SubjectContent for PipelineRunFinishedContent {
    const SUBJECT_TYPE: &'static str = "pipelineRun";
}

event_kind!(PipelineRunQueued, "pipelinerun", "queued", PipelineRunContent);
event_kind!(PipelineRunStarted, "pipelinerun", "started", PipelineRunContent);
event_kind!(
    PipelineRunFinished,
    "pipelinerun",
    "finished",
    PipelineRunFinishedContent
);

pub type PipelineRunQueuedEvent = CDEvent<PipelineRunQueued>;
pub type PipelineRunStartedEvent = CDEvent<PipelineRunStarted>;
pub type PipelineRunFinishedEvent = CDEvent<PipelineRunFinished>;

pub fn new_pipelinerun_queued_event(
    fields: EventFields,
    content: PipelineRunContent,
) -> Result<PipelineRunQueuedEvent> {
    CDEvent::new(fields, content)
}

pub fn new_pipelinerun_started_event(
    fields: EventFields,
    content: PipelineRunContent,
) -> Result<PipelineRunStartedEvent> {
    CDEvent::new(fields, content)
}

pub fn new_pipelinerun_finished_event(
    fields: EventFields,
    content: PipelineRunFinishedContent,
) -> Result<PipelineRunFinishedEvent> {
    CDEvent::new(fields, content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_pipelinerun_subject_type_is_camel_case() {
        let fields = EventFields::new("ctx", "/tekton", Utc::now(), "run-1");
        let content = PipelineRunFinishedContent {
            pipeline_name: Some("release".to_string()),
            outcome: Some(RunOutcome::Failure),
            errors: Some("step 'push' exited 1".to_string()),
            ..Default::default()
        };
        let json = new_pipelinerun_finished_event(fields, content)
            .unwrap()
            .to_json()
            .unwrap();

        assert_eq!(json["context"]["type"], "dev.cdevents.pipelinerun.finished.0.3.0");
        assert_eq!(json["subject"]["type"], "pipelineRun");
        assert_eq!(json["subject"]["content"]["pipelineName"], "release");
        assert_eq!(json["subject"]["content"]["outcome"], "failure");
    }
}
