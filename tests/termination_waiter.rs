// tests/termination_waiter.rs

mod common;
use crate::common::builders::ServiceDescriptorBuilder;
use crate::common::{CLUSTER, SERVICE, init_tracing, with_time_limit};

use std::error::Error;
use std::time::Duration;

use tokio::time::{Instant, sleep};
use tokio_util::sync::CancellationToken;

use ecsrun::engine::{WaitOptions, build_launch_request, launch_task, wait_for_stop};
use ecsrun::errors::EcsrunError;
use ecsrun::model::{LogicalSlot, OverrideSpec, TaskHandle};
use ecsrun_test_utils::{Call, FakeControlPlane, LaunchScript};

type TestResult = Result<(), Box<dyn Error>>;

fn options(max_wait: u64, poll: u64) -> WaitOptions {
    WaitOptions {
        max_wait: Duration::from_secs(max_wait),
        poll_interval: Duration::from_secs(poll),
    }
}

async fn launch(control: &FakeControlPlane) -> Result<TaskHandle, EcsrunError> {
    let descriptor = ServiceDescriptorBuilder::new(CLUSTER, SERVICE).build();
    let slot = LogicalSlot::new("batch", SERVICE)?;
    let request = build_launch_request(&descriptor, &OverrideSpec::none(), &slot)?;
    launch_task(control, &request).await
}

fn describe_calls(control: &FakeControlPlane) -> usize {
    control
        .calls()
        .iter()
        .filter(|c| matches!(c, Call::DescribeTasks { .. }))
        .count()
}

#[tokio::test(start_paused = true)]
async fn returns_snapshot_once_task_stops() -> TestResult {
    init_tracing();

    let control = FakeControlPlane::new().on_launch(LaunchScript::Stops {
        polls: 3,
        exit_code: Some(0),
        stop_reason: Some("Essential container in task exited".to_string()),
    });
    let task = launch(&control).await?;

    let started = Instant::now();
    let snapshot = wait_for_stop(
        &control,
        CLUSTER,
        &task,
        &options(600, 6),
        &CancellationToken::new(),
    )
    .await?;

    assert!(snapshot.is_stopped());
    assert_eq!(snapshot.handle, task);
    assert_eq!(describe_calls(&control), 3);
    // Two sleeps between three polls.
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(12));
    assert!(elapsed < Duration::from_secs(13));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn times_out_within_one_interval_and_leaves_task_running() -> TestResult {
    with_time_limit(Duration::from_secs(120), async {
        init_tracing();

        let control = FakeControlPlane::new().on_launch(LaunchScript::NeverStops);
        let task = launch(&control).await?;

        let started = Instant::now();
        let result = wait_for_stop(
            &control,
            CLUSTER,
            &task,
            &options(60, 25),
            &CancellationToken::new(),
        )
        .await;
        let elapsed = started.elapsed();

        match result {
            Err(EcsrunError::Timeout { task: t, waited }) => {
                assert_eq!(t, task.to_string());
                assert_eq!(waited, Duration::from_secs(60));
            }
            other => panic!("Expected Timeout, got: {:?}", other),
        }

        // The last sleep is clipped to the deadline.
        assert!(elapsed >= Duration::from_secs(60));
        assert!(elapsed <= Duration::from_secs(60 + 25));
        assert_eq!(control.status_of(&task).as_deref(), Some("RUNNING"));
        assert!(control.stop_requests().is_empty());
        Ok(())
    })
    .await
}

#[tokio::test]
async fn unrepresentable_deadline_is_an_error_not_a_panic() -> TestResult {
    let control = FakeControlPlane::new().on_launch(LaunchScript::NeverStops);
    let task = launch(&control).await?;

    let options = WaitOptions {
        max_wait: Duration::MAX,
        poll_interval: Duration::from_secs(6),
    };
    let result = wait_for_stop(&control, CLUSTER, &task, &options, &CancellationToken::new()).await;

    assert!(matches!(result, Err(EcsrunError::Validation(_))));
    assert_eq!(describe_calls(&control), 0);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn cancellation_stops_observing_but_not_the_task() -> TestResult {
    init_tracing();

    let control = FakeControlPlane::new().on_launch(LaunchScript::NeverStops);
    let task = launch(&control).await?;

    let cancel = CancellationToken::new();
    {
        let token = cancel.clone();
        tokio::spawn(async move {
            sleep(Duration::from_secs(15)).await;
            token.cancel();
        });
    }

    let started = Instant::now();
    let result = wait_for_stop(&control, CLUSTER, &task, &options(600, 10), &cancel).await;

    assert!(matches!(result, Err(EcsrunError::Cancelled(_))));
    assert!(started.elapsed() < Duration::from_secs(600));
    assert_eq!(control.status_of(&task).as_deref(), Some("RUNNING"));
    assert!(control.stop_requests().is_empty());
    Ok(())
}

#[tokio::test]
async fn already_cancelled_token_returns_immediately() -> TestResult {
    let control = FakeControlPlane::new().on_launch(LaunchScript::NeverStops);
    let task = launch(&control).await?;

    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = wait_for_stop(&control, CLUSTER, &task, &options(600, 10), &cancel).await;

    assert!(matches!(result, Err(EcsrunError::Cancelled(_))));
    assert_eq!(describe_calls(&control), 0);
    Ok(())
}

#[tokio::test]
async fn unknown_task_is_not_found() {
    let control = FakeControlPlane::new();
    let task = TaskHandle::new("arn:aws:ecs:us-east-1:123456789012:task/prod/missing");

    let result = wait_for_stop(
        &control,
        CLUSTER,
        &task,
        &options(60, 5),
        &CancellationToken::new(),
    )
    .await;

    assert!(matches!(result, Err(EcsrunError::NotFound(_))));
}
