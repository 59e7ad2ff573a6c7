// src/engine/launch.rs

use tracing::{info, warn};

use crate::control::ControlPlane;
use crate::errors::{EcsrunError, Result};
use crate::model::{LaunchRequest, TaskHandle};

/// Submit `request` and return the handle of the task it created.
///
/// Any rejection, whether a transport error or a response without tasks,
/// is a `Launch` error. Nothing is retried here.
pub async fn launch_task<C: ControlPlane>(control: &C, request: &LaunchRequest) -> Result<TaskHandle> {
    info!(
        cluster = %request.cluster,
        task_definition = %request.task_definition,
        group = %request.group,
        "running task"
    );

    let result = control.run_task(request).await.map_err(|err| match err {
        EcsrunError::Launch(msg) => EcsrunError::Launch(msg),
        other => EcsrunError::Launch(other.to_string()),
    })?;

    let mut tasks = result.tasks.into_iter();
    let Some(handle) = tasks.next() else {
        let reasons: Vec<String> = result.failures.iter().map(ToString::to_string).collect();
        let msg = if reasons.is_empty() {
            "run request returned no task".to_string()
        } else {
            reasons.join("; ")
        };
        return Err(EcsrunError::Launch(msg));
    };

    let extra = tasks.count();
    if extra > 0 {
        warn!(task = %handle, extra, "run request created more than one task; tracking the first");
    }
    for failure in &result.failures {
        warn!(task = %handle, failure = %failure, "run request reported a partial failure");
    }

    info!(task = %handle, "task launched");
    Ok(handle)
}
