// src/engine/classify.rs

use crate::model::{TaskHandle, TaskSnapshot};

/// Default link to the task's logs on the console. `{region}`, `{cluster}`
/// and `{task}` are replaced.
pub const DEFAULT_CONSOLE_URL_TEMPLATE: &str =
    "https://console.aws.amazon.com/ecs/home?region={region}#/clusters/{cluster}/tasks/{task}/logs";

/// Terminal state of a task, reduced to what decides success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskOutcome {
    /// Exit code of the primary container; absent if it never reported one.
    pub exit_code: Option<i32>,
    pub stop_reason: Option<String>,
}

impl TaskOutcome {
    /// Reduce a stopped task's snapshot.
    ///
    /// The primary container is `primary` when given and present in the
    /// snapshot, otherwise the first container listed.
    pub fn from_snapshot(snapshot: &TaskSnapshot, primary: Option<&str>) -> Self {
        let container = primary
            .and_then(|name| snapshot.containers.iter().find(|c| c.name == name))
            .or_else(|| snapshot.containers.first());

        Self {
            exit_code: container.and_then(|c| c.exit_code),
            stop_reason: snapshot.stopped_reason.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Success,
    /// Carries the stop reason, or a description when there is none.
    Failure(String),
}

impl Verdict {
    pub fn is_success(&self) -> bool {
        matches!(self, Verdict::Success)
    }
}

/// Exit code 0 is success; anything else, including no exit code at all,
/// is a failure.
pub fn classify(outcome: &TaskOutcome) -> Verdict {
    match outcome.exit_code {
        Some(0) => Verdict::Success,
        Some(code) => Verdict::Failure(
            outcome
                .stop_reason
                .clone()
                .unwrap_or_else(|| format!("container exited with code {code}")),
        ),
        None => Verdict::Failure(
            outcome
                .stop_reason
                .clone()
                .unwrap_or_else(|| "task stopped without reporting an exit code".to_string()),
        ),
    }
}

pub fn console_url(template: &str, region: &str, cluster: &str, task: &TaskHandle) -> String {
    template
        .replace("{region}", region)
        .replace("{cluster}", cluster)
        .replace("{task}", task.suffix())
}
