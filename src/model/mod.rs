// src/model/mod.rs

//! Value types shared by the control plane and the launch pipeline.
//!
//! Everything here is an immutable snapshot owned by a single invocation.

pub mod descriptor;
pub mod request;
pub mod slot;
pub mod task;

pub use descriptor::{
    AssignPublicIp, CapacityProviderItem, LaunchMode, LaunchType, NetworkConfiguration,
    ServiceDescriptor, ServiceStatus, task_family,
};
pub use request::{ContainerOverride, LaunchRequest, OverrideSpec, STARTED_BY};
pub use slot::{DEFAULT_LABEL, LogicalSlot, RESERVED_LABEL};
pub use task::{ContainerState, LaunchFailure, RunTaskResult, TaskHandle, TaskSnapshot};
