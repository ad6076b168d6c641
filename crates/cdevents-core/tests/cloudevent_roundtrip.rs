//! Round trips through the CloudEvents envelope.
//!
//! Every event here is built with a typed constructor, wrapped, serialized to
//! text, parsed back and decoded through the default registry. The decoded
//! event must equal the original and its body must satisfy the bundled schema.

use cdevents_core::events::*;
use cdevents_core::{
    from_cloud_event, AnyCDEvent, CDEvent, CloudEvent, CustomData, EventFields, Reference,
    SchemaRegistry,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::json;

fn timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap() + Duration::milliseconds(123)
}

fn fields(id: &str) -> EventFields {
    EventFields::new(id, "/event/source/123", timestamp(), "subject-1")
}

fn through_the_wire(event: &AnyCDEvent) -> AnyCDEvent {
    let text = event.to_cloud_event().unwrap().to_json().unwrap();
    let envelope = CloudEvent::from_json(&text).unwrap();
    from_cloud_event(&envelope).unwrap()
}

fn sample_events() -> Vec<AnyCDEvent> {
    let env = Reference::new("staging").with_source("/envs");
    let repo = Reference::new("cdevents/sdk-rust");

    let mut finished_run = PipelineRunFinishedContent {
        pipeline_name: Some("release".to_string()),
        ..Default::default()
    };
    finished_run.outcome = Some(RunOutcome::Failure);
    finished_run.errors = Some("lint failed".to_string());

    let mut test_run = TestCaseRunFinishedContent::new(env.clone(), TestOutcome::Pass);
    test_run.test_case = Some(TestCase::new("login-flow"));

    vec![
        new_repository_created_event(
            fields("repo-1"),
            RepositoryCreatedContent::new("sdk-rust", "https://github.com/cdevents/sdk-rust")
                .with_owner("cdevents"),
        )
        .unwrap()
        .into(),
        new_branch_created_event(fields("branch-1"), Some(repo.clone()))
            .unwrap()
            .into(),
        new_change_merged_event(fields("change-1"), Some(repo))
            .unwrap()
            .into(),
        new_build_queued_event(fields("build-0")).unwrap().into(),
        new_build_finished_event(fields("build-1"), "pkg:generic/foo@1.0")
            .unwrap()
            .into(),
        new_testcaserun_finished_event(fields("test-1"), test_run)
            .unwrap()
            .into(),
        new_pipelinerun_finished_event(fields("run-1"), finished_run)
            .unwrap()
            .into(),
        new_taskrun_started_event(
            fields("task-1"),
            TaskRunContent {
                task_name: Some("unit".to_string()),
                pipeline_run: Some(Reference::new("run-1")),
                ..Default::default()
            },
        )
        .unwrap()
        .into(),
        new_artifact_packaged_event(fields("artifact-1"), Reference::new("change-1"))
            .unwrap()
            .into(),
        new_environment_created_event(
            fields("env-1"),
            EnvironmentContent {
                name: Some("staging".to_string()),
                url: None,
            },
        )
        .unwrap()
        .into(),
        new_service_deployed_event(fields("svc-1"), env.clone(), "pkg:oci/app@sha256:abc")
            .unwrap()
            .into(),
        new_service_removed_event(fields("svc-2"), env).unwrap().into(),
    ]
}

#[test]
fn roundtrip_preserves_every_field() {
    for event in sample_events() {
        let back = through_the_wire(&event);
        assert_eq!(back, event, "round trip changed {}", event.event_type());
    }
}

#[test]
fn roundtrip_bodies_satisfy_bundled_schemas() {
    let schemas = SchemaRegistry::bundled().unwrap();
    for event in sample_events() {
        let envelope = event.to_cloud_event().unwrap();
        let report = schemas.validate_cloud_event(&envelope).unwrap();
        assert!(
            report.is_valid(),
            "{} violated its schema: {:?}",
            event.event_type(),
            report.violations
        );
    }
}

#[test]
fn roundtrip_keeps_subsecond_timestamp() {
    let event = new_build_started_event(fields("build-2")).unwrap();
    let envelope = event.to_cloud_event().unwrap();
    let wire: serde_json::Value = serde_json::from_str(&envelope.to_json().unwrap()).unwrap();
    assert_eq!(wire["time"], "2024-03-01T12:30:00.123Z");
    assert_eq!(wire["data"]["context"]["timestamp"], "2024-03-01T12:30:00.123Z");

    let back = CDEvent::<BuildStarted>::from_cloud_event(&envelope).unwrap();
    assert_eq!(back.context().timestamp(), timestamp());
}

#[test]
fn custom_text_stays_text() {
    let event = new_build_queued_event(
        fields("build-3")
            .with_custom_data("plain payload")
            .with_custom_data_content_type("text/plain"),
    )
    .unwrap();

    let back = through_the_wire(&event.clone().into());
    assert_eq!(back.custom_data(), Some(&CustomData::from("plain payload")));
    assert_eq!(back.custom_data_content_type(), Some("text/plain"));
    assert_eq!(back.downcast::<BuildQueued>().unwrap(), event);
}

#[test]
fn custom_mapping_stays_mapping() {
    let data = CustomData::try_from(json!({"hello_message": "hi!", "count": 2})).unwrap();
    let event = new_artifact_published_event(
        fields("artifact-2")
            .with_custom_data(data.clone())
            .with_custom_data_content_type("application/json"),
    )
    .unwrap();

    let envelope = event.to_cloud_event().unwrap();
    assert_eq!(envelope.data["customData"]["hello_message"], "hi!");
    assert_eq!(envelope.data["customDataContentType"], "application/json");

    let back = through_the_wire(&event.into());
    assert_eq!(back.custom_data(), Some(&data));
    assert!(back.custom_data().unwrap().as_map().is_some());
}

#[test]
fn chain_id_survives_roundtrip() {
    let event = new_build_finished_event(
        fields("build-4").with_chain_id("build-0"),
        "pkg:generic/foo@1.1",
    )
    .unwrap();
    let back = through_the_wire(&event.into());
    assert_eq!(back.context().chain_id(), Some("build-0"));
}

#[test]
fn subject_source_survives_roundtrip() {
    let event = new_build_queued_event(fields("build-5").with_subject_source("/builds")).unwrap();
    let back = through_the_wire(&event.into());
    assert_eq!(back.subject_source(), "/builds");
    assert_eq!(back.context().source(), "/event/source/123");
}
