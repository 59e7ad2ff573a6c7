// src/engine/wait.rs

//! Bounded polling until a task stops.

use std::time::Duration;

use tokio::time::{Instant, sleep};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::control::ControlPlane;
use crate::errors::{EcsrunError, Result};
use crate::model::{TaskHandle, TaskSnapshot};

/// 100 minutes.
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(6000);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(6);
/// Longest wait accepted from configuration (7 days).
pub const MAX_WAIT_LIMIT: Duration = Duration::from_secs(7 * 24 * 60 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    pub max_wait: Duration,
    pub poll_interval: Duration,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            max_wait: DEFAULT_MAX_WAIT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Poll `task` until it reaches a terminal state.
///
/// - Fails with `Timeout` once `max_wait` has elapsed; the last sleep is
///   clipped to the deadline so the overrun is at most one status call.
/// - Fails with `Cancelled` as soon as `cancel` fires.
///
/// The remote task is never stopped here, whatever the outcome.
pub async fn wait_for_stop<C: ControlPlane>(
    control: &C,
    cluster: &str,
    task: &TaskHandle,
    options: &WaitOptions,
    cancel: &CancellationToken,
) -> Result<TaskSnapshot> {
    let started = Instant::now();
    let deadline = started.checked_add(options.max_wait).ok_or_else(|| {
        EcsrunError::validation(format!("max-wait {:?} is out of range", options.max_wait))
    })?;
    let mut last_status = String::new();

    info!(task = %task, max_wait = ?options.max_wait, "waiting for task to stop");

    loop {
        let snapshot = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(cancelled(task)),
            res = describe_one(control, cluster, task) => res?,
        };

        if snapshot.last_status != last_status {
            debug!(task = %task, status = %snapshot.last_status, "task status changed");
            last_status = snapshot.last_status.clone();
        }

        if snapshot.is_stopped() {
            info!(task = %task, elapsed = ?started.elapsed(), "task stopped");
            return Ok(snapshot);
        }

        let now = Instant::now();
        if now >= deadline {
            return Err(EcsrunError::Timeout {
                task: task.to_string(),
                waited: options.max_wait,
            });
        }

        let pause = options.poll_interval.min(deadline - now);
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(cancelled(task)),
            _ = sleep(pause) => {}
        }
    }
}

fn cancelled(task: &TaskHandle) -> EcsrunError {
    EcsrunError::Cancelled(format!("stopped waiting for task {task}; it was left running"))
}

async fn describe_one<C: ControlPlane>(
    control: &C,
    cluster: &str,
    task: &TaskHandle,
) -> Result<TaskSnapshot> {
    control
        .describe_tasks(cluster, std::slice::from_ref(task))
        .await?
        .into_iter()
        .find(|t| &t.handle == task)
        .ok_or_else(|| EcsrunError::NotFound(format!("task {task} in cluster {cluster}")))
}
