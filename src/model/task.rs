// src/model/task.rs

//! Task identity and observed task state.

use std::fmt;

/// Opaque task identifier (a task ARN in production).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle(String);

impl TaskHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Trailing path segment, i.e. the task id inside an ARN.
    pub fn suffix(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Last status value of a task that will not change anymore.
pub const STOPPED_STATUS: &str = "STOPPED";
const DELETED_STATUS: &str = "DELETED";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerState {
    pub name: String,
    /// Only present once the container has exited.
    pub exit_code: Option<i32>,
    pub reason: Option<String>,
}

/// One observation of a task as reported by the control plane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSnapshot {
    pub handle: TaskHandle,
    pub group: Option<String>,
    pub last_status: String,
    pub stop_code: Option<String>,
    pub stopped_reason: Option<String>,
    pub containers: Vec<ContainerState>,
}

impl TaskSnapshot {
    pub fn is_stopped(&self) -> bool {
        self.last_status == STOPPED_STATUS || self.last_status == DELETED_STATUS
    }

    pub fn in_group(&self, group: &str) -> bool {
        self.group.as_deref() == Some(group)
    }
}

/// A rejection reported by the provider for a run request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchFailure {
    pub arn: Option<String>,
    pub reason: Option<String>,
    pub detail: Option<String>,
}

impl fmt::Display for LaunchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason.as_deref().unwrap_or("unknown reason"))?;
        if let Some(detail) = &self.detail {
            write!(f, " ({detail})")?;
        }
        if let Some(arn) = &self.arn {
            write!(f, " [{arn}]")?;
        }
        Ok(())
    }
}

/// Raw result of a run request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunTaskResult {
    pub tasks: Vec<TaskHandle>,
    pub failures: Vec<LaunchFailure>,
}
