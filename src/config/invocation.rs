// src/config/invocation.rs

//! The validated set of parameters for one invocation.
//!
//! Inputs from the command line and from the optional config file are both
//! lowered into an [`InvocationInput`], merged, and then checked once via
//! `TryFrom`. Nothing past this boundary needs to re-validate user input.

use tracing::debug;

use crate::config::duration::parse_duration;
use crate::engine::classify::DEFAULT_CONSOLE_URL_TEMPLATE;
use crate::engine::fetch::FetchPolicy;
use crate::engine::wait::{MAX_WAIT_LIMIT, WaitOptions};
use crate::errors::{EcsrunError, Result};
use crate::model::{DEFAULT_LABEL, LaunchType, LogicalSlot, OverrideSpec};
use crate::types::{MissingServicePolicy, NetworkPolicy};

/// Unvalidated invocation parameters; every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvocationInput {
    pub cluster: Option<String>,
    pub service: Option<String>,
    pub slot_label: Option<String>,
    pub wait_for_finish: Option<bool>,
    pub stop_existing: Option<bool>,
    pub override_container: Option<String>,
    pub override_command: Vec<String>,
    pub max_wait: Option<String>,
    pub poll_interval: Option<String>,
    pub missing_service: Option<MissingServicePolicy>,
    pub network: Option<NetworkPolicy>,
    pub launch_type: Option<LaunchType>,
    pub stop_reason: Option<String>,
    pub region: Option<String>,
    pub console_url_template: Option<String>,
}

impl InvocationInput {
    /// Fill every unset field of `self` from `fallback`.
    pub fn or(self, fallback: InvocationInput) -> Self {
        Self {
            cluster: self.cluster.or(fallback.cluster),
            service: self.service.or(fallback.service),
            slot_label: self.slot_label.or(fallback.slot_label),
            wait_for_finish: self.wait_for_finish.or(fallback.wait_for_finish),
            stop_existing: self.stop_existing.or(fallback.stop_existing),
            override_container: self.override_container.or(fallback.override_container),
            override_command: if self.override_command.is_empty() {
                fallback.override_command
            } else {
                self.override_command
            },
            max_wait: self.max_wait.or(fallback.max_wait),
            poll_interval: self.poll_interval.or(fallback.poll_interval),
            missing_service: self.missing_service.or(fallback.missing_service),
            network: self.network.or(fallback.network),
            launch_type: self.launch_type.or(fallback.launch_type),
            stop_reason: self.stop_reason.or(fallback.stop_reason),
            region: self.region.or(fallback.region),
            console_url_template: self.console_url_template.or(fallback.console_url_template),
        }
    }
}

/// Everything the launch pipeline needs, already validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub cluster: String,
    pub service: String,
    pub slot: LogicalSlot,
    pub overrides: OverrideSpec,
    pub wait_for_finish: bool,
    pub stop_existing: bool,
    pub wait: WaitOptions,
    pub fetch: FetchPolicy,
    /// Reason attached to stop requests issued while vacating the slot.
    pub stop_reason: String,
    /// Provider region, used for the console link.
    pub region: Option<String>,
    pub console_url_template: String,
}

impl TryFrom<InvocationInput> for Invocation {
    type Error = EcsrunError;

    fn try_from(input: InvocationInput) -> std::result::Result<Self, Self::Error> {
        let cluster = required(input.cluster, "cluster")?;
        let service = required(input.service, "service")?;

        let label = input.slot_label.unwrap_or_else(|| DEFAULT_LABEL.to_string());
        let slot = LogicalSlot::new(&label, &service)?;

        let overrides = OverrideSpec::new(input.override_container, input.override_command);
        // Reject a lone container or command here, before any remote call.
        overrides.to_container_override()?;

        let wait = wait_options(input.max_wait.as_deref(), input.poll_interval.as_deref())?;

        let fetch = FetchPolicy {
            missing_service: input.missing_service.unwrap_or_default(),
            network: input.network.unwrap_or_default(),
            fallback_launch_type: Some(input.launch_type.unwrap_or(LaunchType::Fargate)),
        };

        let stop_reason = input
            .stop_reason
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| format!("Stopped by ecsrun: replaced by a new task in slot {slot}"));

        let console_url_template = input
            .console_url_template
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CONSOLE_URL_TEMPLATE.to_string());

        let invocation = Invocation {
            cluster,
            service,
            slot,
            overrides,
            wait_for_finish: input.wait_for_finish.unwrap_or(false),
            stop_existing: input.stop_existing.unwrap_or(false),
            wait,
            fetch,
            stop_reason,
            region: input.region.filter(|r| !r.trim().is_empty()),
            console_url_template,
        };

        debug!(?invocation, "validated invocation");
        Ok(invocation)
    }
}

fn required(value: Option<String>, name: &str) -> Result<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(EcsrunError::validation(format!("{name} is required"))),
    }
}

fn wait_options(max_wait: Option<&str>, poll_interval: Option<&str>) -> Result<WaitOptions> {
    let defaults = WaitOptions::default();

    let max_wait = match max_wait {
        Some(s) => parse_duration(s).map_err(|e| EcsrunError::validation(format!("max-wait: {e}")))?,
        None => defaults.max_wait,
    };
    if max_wait.is_zero() {
        return Err(EcsrunError::validation("max-wait must be greater than zero"));
    }
    if max_wait > MAX_WAIT_LIMIT {
        return Err(EcsrunError::validation(format!(
            "max-wait ({max_wait:?}) must not exceed {MAX_WAIT_LIMIT:?}"
        )));
    }

    let poll_interval = match poll_interval {
        Some(s) => {
            parse_duration(s).map_err(|e| EcsrunError::validation(format!("poll-interval: {e}")))?
        }
        None => defaults.poll_interval.min(max_wait),
    };

    if poll_interval.is_zero() {
        return Err(EcsrunError::validation("poll-interval must be greater than zero"));
    }
    if poll_interval > max_wait {
        return Err(EcsrunError::validation(format!(
            "poll-interval ({poll_interval:?}) must not exceed max-wait ({max_wait:?})"
        )));
    }

    Ok(WaitOptions {
        max_wait,
        poll_interval,
    })
}
