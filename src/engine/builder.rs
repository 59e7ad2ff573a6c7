// src/engine/builder.rs

use crate::errors::Result;
use crate::model::{LaunchRequest, LogicalSlot, OverrideSpec, STARTED_BY, ServiceDescriptor};

/// Assemble the run request for one invocation.
///
/// Pure: the result depends only on the arguments. Task definition, launch
/// mode, platform version and network configuration are copied verbatim
/// from the descriptor; an absent network configuration stays absent.
pub fn build_launch_request(
    descriptor: &ServiceDescriptor,
    overrides: &OverrideSpec,
    slot: &LogicalSlot,
) -> Result<LaunchRequest> {
    let container_override = overrides.to_container_override()?;

    Ok(LaunchRequest {
        cluster: descriptor.cluster.clone(),
        task_definition: descriptor.task_definition.clone(),
        launch_mode: descriptor.launch_mode.clone(),
        platform_version: descriptor.platform_version.clone(),
        network: descriptor.network.clone(),
        group: slot.clone(),
        container_override,
        started_by: STARTED_BY.to_string(),
    })
}
