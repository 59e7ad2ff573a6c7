// src/engine/fetch.rs

//! Resolve a service into its current configuration.

use tracing::{debug, warn};

use crate::control::ControlPlane;
use crate::errors::{EcsrunError, Result};
use crate::model::{LaunchMode, LaunchType, ServiceDescriptor};
use crate::types::{MissingServicePolicy, NetworkPolicy};

/// Policies applied while fetching the service descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchPolicy {
    pub missing_service: MissingServicePolicy,
    pub network: NetworkPolicy,
    /// Launch type used when the service reports neither a launch type nor
    /// a capacity provider strategy. `None` lets the cluster default apply.
    pub fallback_launch_type: Option<LaunchType>,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            missing_service: MissingServicePolicy::Fail,
            network: NetworkPolicy::Optional,
            fallback_launch_type: Some(LaunchType::Fargate),
        }
    }
}

/// Fetch the active descriptor of `service` in `cluster`.
///
/// Returns `Ok(None)` only under [`MissingServicePolicy::Skip`], when the
/// service does not exist or none of its matches is active.
pub async fn fetch_service<C: ControlPlane>(
    control: &C,
    cluster: &str,
    service: &str,
    policy: &FetchPolicy,
) -> Result<Option<ServiceDescriptor>> {
    debug!(cluster, service, "describing service");
    let matches = control.describe_services(cluster, service).await?;

    let found = !matches.is_empty();
    let active = matches
        .into_iter()
        .filter(|d| d.matches(service))
        .find(|d| d.status.is_active());

    let Some(mut descriptor) = active else {
        let what = if found {
            format!("active service {service} in cluster {cluster}")
        } else {
            format!("service {service} in cluster {cluster}")
        };
        return match policy.missing_service {
            MissingServicePolicy::Fail => Err(EcsrunError::NotFound(what)),
            MissingServicePolicy::Skip => {
                warn!(cluster, service, "{what} not found; skipping launch");
                Ok(None)
            }
        };
    };

    if descriptor.network.is_none() && policy.network == NetworkPolicy::Required {
        return Err(EcsrunError::NotFound(format!(
            "network configuration of service {service} in cluster {cluster}"
        )));
    }

    if descriptor.launch_mode.is_none() {
        if let Some(lt) = policy.fallback_launch_type {
            debug!(service, launch_type = %lt, "service has no launch mode; using fallback");
            descriptor.launch_mode = Some(LaunchMode::LaunchType(lt));
        }
    }

    debug!(
        service = %descriptor.service_name,
        task_definition = %descriptor.task_definition,
        has_network = descriptor.network.is_some(),
        "resolved service"
    );

    Ok(Some(descriptor))
}
