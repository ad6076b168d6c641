//! Events under `dev.cdevents.testcaserun`.

use serde::{Deserialize, Serialize};

use crate::cdevent::{CDEvent, EventFields};
use crate::error::{require_non_empty, Result};
use crate::subject::{Reference, SubjectContent};

/// The test case being executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Kind of test, e.g. `unit`, `integration`, `e2e`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub test_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

impl TestCase {
    pub fn new(id: impl Into<String>) -> Self {
        TestCase {
            id: id.into(),
            name: None,
            version: None,
            test_type: None,
            uri: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestOutcome {
    Pass,
    Fail,
    Cancel,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseRunContent {
    /// Environment the test runs in.
    pub environment: Reference,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_case: Option<TestCase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_suite_run: Option<Reference>,
}

impl TestCaseRunContent {
    pub fn new(environment: Reference) -> Self {
        TestCaseRunContent {
            environment,
            test_case: None,
            test_suite_run: None,
        }
    }
}

impl SubjectContent for TestCaseRunContent {
    const SUBJECT_TYPE: &'static str = "testCaseRun";

    fn validate(&self) -> Result<()> {
        validate_refs(&self.environment, &self.test_case, &self.test_suite_run)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseRunFinishedContent {
    pub environment: Reference,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_case: Option<TestCase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_suite_run: Option<Reference>,
    pub outcome: TestOutcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl TestCaseRunFinishedContent {
    pub fn new(environment: Reference, outcome: TestOutcome) -> Self {
        TestCaseRunFinishedContent {
            environment,
            test_case: None,
            test_suite_run: None,
            outcome,
            reason: None,
        }
    }
}

impl SubjectContent for TestCaseRunFinishedContent {
    const SUBJECT_TYPE: &'static str = "testCaseRun";

    fn validate(&self) -> Result<()> {
        validate_refs(&self.environment, &self.test_case, &self.test_suite_run)
    }
}

fn validate_refs(
    environment: &Reference,
    test_case: &Option<TestCase>,
    test_suite_run: &Option<Reference>,
) -> Result<()> {
    environment.validate("environment")?;
    if let Some(test_case) = test_case {
        require_non_empty("test case id", &test_case.id)?;
    }
    if let Some(suite) = test_suite_run {
        suite.validate("test suite run")?;
    }
    Ok(())
}

event_kind!(TestCaseRunQueued, "testcaserun", "queued", TestCaseRunContent);
event_kind!(TestCaseRunStarted, "testcaserun", "started", TestCaseRunContent);
event_kind!(
    TestCaseRunFinished,
    "testcaserun",
    "finished",
    TestCaseRunFinishedContent
);

pub type TestCaseRunQueuedEvent = CDEvent<TestCaseRunQueued>;
pub type TestCaseRunStartedEvent = CDEvent<TestCaseRunStarted>;
pub type TestCaseRunFinishedEvent = CDEvent<TestCaseRunFinished>;

pub fn new_testcaserun_queued_event(
    fields: EventFields,
    content: TestCaseRunContent,
) -> Result<TestCaseRunQueuedEvent> {
    CDEvent::new(fields, content)
}

pub fn new_testcaserun_started_event(
    fields: EventFields,
    content: TestCaseRunContent,
) -> Result<TestCaseRunStartedEvent> {
    CDEvent::new(fields, content)
}

pub fn new_testcaserun_finished_event(
    fields: EventFields,
    content: TestCaseRunFinishedContent,
) -> Result<TestCaseRunFinishedEvent> {
    CDEvent::new(fields, content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_testcaserun_finished_wire_shape() {
        let fields = EventFields::new("ctx", "/testkube", Utc::now(), "tcr-7");
        let mut content =
            TestCaseRunFinishedContent::new(Reference::new("staging"), TestOutcome::Fail);
        content.test_case = Some(TestCase {
            test_type: Some("integration".to_string()),
            ..TestCase::new("login-flow")
        });
        content.reason = Some("timeout".to_string());

        let json = new_testcaserun_finished_event(fields, content)
            .unwrap()
            .to_json()
            .unwrap();
        let content = &json["subject"]["content"];
        assert_eq!(json["subject"]["type"], "testCaseRun");
        assert_eq!(content["outcome"], "fail");
        assert_eq!(content["testCase"]["type"], "integration");
        assert_eq!(content["environment"]["id"], "staging");
    }

    #[test]
    fn test_testcaserun_requires_environment_id() {
        let fields = EventFields::new("ctx", "/testkube", Utc::now(), "tcr-7");
        let result = new_testcaserun_started_event(fields, TestCaseRunContent::new(Reference::new("")));
        assert!(result.is_err());
    }
}
