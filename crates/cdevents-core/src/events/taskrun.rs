//! Events under `dev.cdevents.taskrun`.

use serde::{Deserialize, Serialize};

use super::pipelinerun::RunOutcome;
use crate::cdevent::{CDEvent, EventFields};
use crate::error::Result;
use crate::subject::{Reference, SubjectContent};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRunContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Pipeline run this task belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline_run: Option<Reference>,
}

impl SubjectContent for TaskRunContent {
    const SUBJECT_TYPE: &'static str = "taskRun";

    fn validate(&self) -> Result<()> {
        match &self.pipeline_run {
            Some(run) => run.validate("pipeline run"),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRunFinishedContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline_run: Option<Reference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<RunOutcome>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<String>,
}

impl SubjectContent for TaskRunFinishedContent {
    const SUBJECT_TYPE: &'static str = "taskRun";

    fn validate(&self) -> Result<()> {
        match &self.pipeline_run {
            Some(run) => run.validate("pipeline run"),
            None => Ok(()),
        }
    }
}

event_kind!(TaskRunStarted, "taskrun", "started", TaskRunContent);
event_kind!(TaskRunFinished, "taskrun", "finished", TaskRunFinishedContent);

pub type TaskRunStartedEvent = CDEvent<TaskRunStarted>;
pub type TaskRunFinishedEvent = CDEvent<TaskRunFinished>;

pub fn new_taskrun_started_event(
    fields: EventFields,
    content: TaskRunContent,
) -> Result<TaskRunStartedEvent> {
    CDEvent::new(fields, content)
}

pub fn new_taskrun_finished_event(
    fields: EventFields,
    content: TaskRunFinishedContent,
) -> Result<TaskRunFinishedEvent> {
    CDEvent::new(fields, content)
}
