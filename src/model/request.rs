// src/model/request.rs

use crate::errors::{EcsrunError, Result};
use crate::model::descriptor::{LaunchMode, NetworkConfiguration};
use crate::model::slot::LogicalSlot;

/// Value recorded as `startedBy` on every launched task.
pub const STARTED_BY: &str = "ecsrun";

/// Optional replacement of one container's command.
///
/// Empty strings are normalised to "not set" so that `--override-container ""`
/// behaves like the flag being absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideSpec {
    container: Option<String>,
    command: Vec<String>,
}

impl OverrideSpec {
    pub fn new(container: Option<String>, command: Vec<String>) -> Self {
        let container = container
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        Self { container, command }
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn container(&self) -> Option<&str> {
        self.container.as_deref()
    }

    pub fn command(&self) -> &[String] {
        &self.command
    }

    pub fn is_empty(&self) -> bool {
        self.container.is_none() && self.command.is_empty()
    }

    /// Check the container/command pairing and produce the override entry,
    /// if any.
    pub fn to_container_override(&self) -> Result<Option<ContainerOverride>> {
        match (&self.container, self.command.is_empty()) {
            (None, true) => Ok(None),
            (None, false) => Err(EcsrunError::validation("override-container required")),
            (Some(_), true) => Err(EcsrunError::validation(
                "override-container-command required",
            )),
            (Some(name), false) => Ok(Some(ContainerOverride {
                name: name.clone(),
                command: self.command.clone(),
            })),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerOverride {
    pub name: String,
    pub command: Vec<String>,
}

/// Fully assembled run request, submitted exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    pub cluster: String,
    pub task_definition: String,
    pub launch_mode: Option<LaunchMode>,
    pub platform_version: Option<String>,
    /// `None` means the field is omitted from the submission.
    pub network: Option<NetworkConfiguration>,
    pub group: LogicalSlot,
    pub container_override: Option<ContainerOverride>,
    pub started_by: String,
}
