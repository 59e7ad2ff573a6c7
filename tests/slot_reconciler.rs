// tests/slot_reconciler.rs

mod common;
use crate::common::{CLUSTER, init_tracing, with_timeout};

use std::error::Error;

use ecsrun::engine::reconcile_slot;
use ecsrun::model::LogicalSlot;
use ecsrun_test_utils::{Call, FakeControlPlane};

type TestResult = Result<(), Box<dyn Error>>;

const REASON: &str = "replaced";

fn slot() -> LogicalSlot {
    LogicalSlot::new("batch", "web").unwrap()
}

#[tokio::test]
async fn disabled_replacement_never_stops_anything() -> TestResult {
    init_tracing();

    let control = FakeControlPlane::new();
    control.add_running_task(CLUSTER, "web", "batch:web");
    control.add_running_task(CLUSTER, "web", "batch:web");

    let report = reconcile_slot(&control, CLUSTER, "web", &slot(), false, REASON).await?;

    assert!(report.matched.is_empty());
    assert!(control.stop_requests().is_empty());
    // Not even a listing happens.
    assert!(control.calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn stops_exactly_the_tasks_in_the_slot() -> TestResult {
    with_timeout(async {
        init_tracing();

        let control = FakeControlPlane::new();
        let a = control.add_running_task(CLUSTER, "web", "batch:web");
        let b = control.add_running_task(CLUSTER, "web", "batch:web");
        let other = control.add_running_task(CLUSTER, "web", "other:web");
        let service_task = control.add_running_task(CLUSTER, "web", "service:web");
        let other_family = control.add_running_task(CLUSTER, "worker", "batch:web");

        let report = reconcile_slot(&control, CLUSTER, "web", &slot(), true, REASON).await?;

        assert_eq!(report.matched, vec![a.clone(), b.clone()]);
        assert_eq!(report.stopped, vec![a.clone(), b.clone()]);
        assert!(report.failed.is_empty());
        assert_eq!(control.stop_requests(), vec![a, b]);

        for untouched in [other, service_task, other_family] {
            assert_eq!(control.status_of(&untouched).as_deref(), Some("RUNNING"));
        }
        Ok(())
    })
    .await
}

#[tokio::test]
async fn stop_failure_does_not_prevent_other_stops() -> TestResult {
    init_tracing();

    let control = FakeControlPlane::new();
    let a = control.add_running_task(CLUSTER, "web", "batch:web");
    let b = control.add_running_task(CLUSTER, "web", "batch:web");
    control.fail_stop_for(&a);

    let report = reconcile_slot(&control, CLUSTER, "web", &slot(), true, REASON).await?;

    assert_eq!(control.stop_requests(), vec![a.clone(), b.clone()]);
    assert_eq!(report.stopped, vec![b]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, a);
    Ok(())
}

#[tokio::test]
async fn stop_requests_carry_the_reason() -> TestResult {
    let control = FakeControlPlane::new();
    let a = control.add_running_task(CLUSTER, "web", "batch:web");

    reconcile_slot(&control, CLUSTER, "web", &slot(), true, REASON).await?;

    let stop = control
        .calls()
        .into_iter()
        .find(|c| matches!(c, Call::StopTask { .. }))
        .expect("a stop request");
    assert_eq!(
        stop,
        Call::StopTask {
            cluster: CLUSTER.to_string(),
            task: a,
            reason: REASON.to_string(),
        }
    );
    Ok(())
}

#[tokio::test]
async fn empty_family_skips_describe() -> TestResult {
    let control = FakeControlPlane::new();

    let report = reconcile_slot(&control, CLUSTER, "web", &slot(), true, REASON).await?;

    assert!(report.matched.is_empty());
    assert_eq!(
        control.calls(),
        vec![Call::ListTasks {
            cluster: CLUSTER.to_string(),
            family: "web".to_string(),
        }]
    );
    Ok(())
}
