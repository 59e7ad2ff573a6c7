// tests/outcome_classifier.rs

use ecsrun::engine::{TaskOutcome, Verdict, classify, console_url};
use ecsrun::engine::classify::DEFAULT_CONSOLE_URL_TEMPLATE;
use ecsrun::model::{ContainerState, TaskHandle, TaskSnapshot};

fn outcome(exit_code: Option<i32>, stop_reason: Option<&str>) -> TaskOutcome {
    TaskOutcome {
        exit_code,
        stop_reason: stop_reason.map(str::to_string),
    }
}

fn stopped_snapshot(containers: Vec<(&str, Option<i32>)>, reason: Option<&str>) -> TaskSnapshot {
    TaskSnapshot {
        handle: TaskHandle::new("arn:aws:ecs:us-east-1:123456789012:task/prod/abc123"),
        group: Some("batch:web".to_string()),
        last_status: "STOPPED".to_string(),
        stop_code: Some("EssentialContainerExited".to_string()),
        stopped_reason: reason.map(str::to_string),
        containers: containers
            .into_iter()
            .map(|(name, exit_code)| ContainerState {
                name: name.to_string(),
                exit_code,
                reason: None,
            })
            .collect(),
    }
}

#[test]
fn exit_code_zero_is_success() {
    assert_eq!(classify(&outcome(Some(0), None)), Verdict::Success);
    // A stop reason does not override a clean exit.
    assert_eq!(
        classify(&outcome(Some(0), Some("Essential container in task exited"))),
        Verdict::Success
    );
}

#[test]
fn non_zero_exit_code_fails_with_stop_reason() {
    assert_eq!(
        classify(&outcome(Some(7), Some("OOM"))),
        Verdict::Failure("OOM".to_string())
    );
}

#[test]
fn non_zero_exit_code_without_reason_mentions_code() {
    match classify(&outcome(Some(137), None)) {
        Verdict::Failure(msg) => assert!(msg.contains("137")),
        Verdict::Success => panic!("exit code 137 must not succeed"),
    }
}

#[test]
fn missing_exit_code_is_never_success() {
    assert_eq!(
        classify(&outcome(None, Some("CannotPullContainerError: image not found"))),
        Verdict::Failure("CannotPullContainerError: image not found".to_string())
    );
    assert!(!classify(&outcome(None, None)).is_success());
}

#[test]
fn snapshot_without_exit_code_keeps_it_absent() {
    let snapshot = stopped_snapshot(
        vec![("app", None)],
        Some("ResourceInitializationError: unable to pull secrets"),
    );

    let outcome = TaskOutcome::from_snapshot(&snapshot, None);

    assert_eq!(outcome.exit_code, None);
    assert_eq!(
        classify(&outcome),
        Verdict::Failure("ResourceInitializationError: unable to pull secrets".to_string())
    );
}

#[test]
fn primary_container_defaults_to_first() {
    let snapshot = stopped_snapshot(vec![("app", Some(3)), ("sidecar", Some(0))], None);
    assert_eq!(TaskOutcome::from_snapshot(&snapshot, None).exit_code, Some(3));
}

#[test]
fn overridden_container_is_primary_when_present() {
    let snapshot = stopped_snapshot(vec![("log-router", Some(0)), ("app", Some(2))], None);

    assert_eq!(
        TaskOutcome::from_snapshot(&snapshot, Some("app")).exit_code,
        Some(2)
    );
    // Unknown names fall back to the first container.
    assert_eq!(
        TaskOutcome::from_snapshot(&snapshot, Some("worker")).exit_code,
        Some(0)
    );
}

#[test]
fn console_url_interpolates_region_cluster_and_task_id() {
    let task = TaskHandle::new("arn:aws:ecs:eu-west-1:123456789012:task/prod/0f1e2d3c4b5a");

    let url = console_url(DEFAULT_CONSOLE_URL_TEMPLATE, "eu-west-1", "prod", &task);

    assert_eq!(
        url,
        "https://console.aws.amazon.com/ecs/home?region=eu-west-1#/clusters/prod/tasks/0f1e2d3c4b5a/logs"
    );
}
