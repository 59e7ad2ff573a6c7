// src/model/slot.rs

use std::fmt;

use crate::errors::{EcsrunError, Result};

/// Label the provider uses for a service's own steady-state tasks
/// (`service:<name>`). Ephemeral tasks must never share it.
pub const RESERVED_LABEL: &str = "service";

/// Label used when the caller does not supply one.
pub const DEFAULT_LABEL: &str = "ephemeral";

/// Provider limit on the length of a task group.
const MAX_GROUP_LEN: usize = 255;

/// Group tag `<label>:<service>` identifying one logical slot.
///
/// Used both as the launched task's group and as the reconciliation filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LogicalSlot(String);

impl LogicalSlot {
    /// `service` may be a name or an ARN; only the name goes into the tag.
    pub fn new(label: &str, service: &str) -> Result<Self> {
        let label = label.trim();
        let service = service.trim();
        let service = service.rsplit('/').next().unwrap_or(service);

        if label.is_empty() {
            return Err(EcsrunError::validation("slot label must not be empty"));
        }
        if label.eq_ignore_ascii_case(RESERVED_LABEL) {
            return Err(EcsrunError::validation(format!(
                "slot label '{label}' is reserved for the service's own tasks"
            )));
        }
        if service.is_empty() {
            return Err(EcsrunError::validation("service must not be empty"));
        }

        let group = format!("{label}:{service}");
        if group.len() > MAX_GROUP_LEN {
            return Err(EcsrunError::validation(format!(
                "task group '{group}' exceeds {MAX_GROUP_LEN} characters"
            )));
        }

        Ok(Self(group))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LogicalSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
