// src/control/ecs.rs

//! Amazon ECS implementation of [`ControlPlane`] on top of `aws-sdk-ecs`.

use aws_sdk_ecs::Client;
use aws_sdk_ecs::error::{DisplayErrorContext, SdkError};
use aws_sdk_ecs::types::{
    AssignPublicIp as EcsAssignPublicIp, AwsVpcConfiguration, CapacityProviderStrategyItem,
    ContainerOverride as EcsContainerOverride, LaunchType as EcsLaunchType,
    NetworkConfiguration as EcsNetworkConfiguration, Service, Task, TaskOverride,
};
use tracing::{debug, warn};

use crate::errors::{EcsrunError, Result};
use crate::model::{
    AssignPublicIp, CapacityProviderItem, ContainerState, LaunchFailure, LaunchMode, LaunchRequest,
    LaunchType, NetworkConfiguration, RunTaskResult, ServiceDescriptor, ServiceStatus, TaskHandle,
    TaskSnapshot,
};

use super::{BoxFuture, ControlPlane};

/// Maximum number of tasks accepted by a single DescribeTasks call.
const DESCRIBE_TASKS_BATCH: usize = 100;

/// Control plane backed by a real ECS client.
///
/// The client carries the SDK's own retry and throttling policy; nothing
/// here retries.
#[derive(Debug, Clone)]
pub struct EcsControlPlane {
    client: Client,
}

impl EcsControlPlane {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_conf(config: &aws_config::SdkConfig) -> Self {
        Self::new(Client::new(config))
    }
}

impl ControlPlane for EcsControlPlane {
    fn describe_services<'a>(
        &'a self,
        cluster: &'a str,
        service: &'a str,
    ) -> BoxFuture<'a, Result<Vec<ServiceDescriptor>>> {
        Box::pin(async move {
            let out = self
                .client
                .describe_services()
                .cluster(cluster)
                .services(service)
                .send()
                .await
                .map_err(|err| {
                    if matches!(err.as_service_error(), Some(e) if e.is_cluster_not_found_exception())
                    {
                        EcsrunError::NotFound(format!("cluster {cluster}"))
                    } else {
                        sdk_error("DescribeServices", err)
                    }
                })?;

            for failure in out.failures() {
                debug!(
                    arn = ?failure.arn(),
                    reason = ?failure.reason(),
                    "describe-services reported a failure"
                );
            }

            out.services()
                .iter()
                .map(|s| service_from_ecs(cluster, service, s))
                .collect()
        })
    }

    fn list_tasks<'a>(
        &'a self,
        cluster: &'a str,
        family: &'a str,
    ) -> BoxFuture<'a, Result<Vec<TaskHandle>>> {
        Box::pin(async move {
            let mut handles = Vec::new();
            let mut next_token: Option<String> = None;

            loop {
                let out = self
                    .client
                    .list_tasks()
                    .cluster(cluster)
                    .family(family)
                    .set_next_token(next_token.take())
                    .send()
                    .await
                    .map_err(|err| sdk_error("ListTasks", err))?;

                handles.extend(out.task_arns().iter().map(TaskHandle::new));

                match out.next_token() {
                    Some(token) if !token.is_empty() => next_token = Some(token.to_string()),
                    _ => break,
                }
            }

            Ok(handles)
        })
    }

    fn describe_tasks<'a>(
        &'a self,
        cluster: &'a str,
        tasks: &'a [TaskHandle],
    ) -> BoxFuture<'a, Result<Vec<TaskSnapshot>>> {
        Box::pin(async move {
            let mut snapshots = Vec::with_capacity(tasks.len());

            for batch in tasks.chunks(DESCRIBE_TASKS_BATCH) {
                let ids: Vec<String> = batch.iter().map(|t| t.as_str().to_string()).collect();
                let out = self
                    .client
                    .describe_tasks()
                    .cluster(cluster)
                    .set_tasks(Some(ids))
                    .send()
                    .await
                    .map_err(|err| {
                        if matches!(err.as_service_error(), Some(e) if e.is_cluster_not_found_exception())
                        {
                            EcsrunError::NotFound(format!("cluster {cluster}"))
                        } else {
                            sdk_error("DescribeTasks", err)
                        }
                    })?;

                for failure in out.failures() {
                    debug!(
                        arn = ?failure.arn(),
                        reason = ?failure.reason(),
                        "describe-tasks reported a failure"
                    );
                }

                snapshots.extend(out.tasks().iter().filter_map(task_from_ecs));
            }

            Ok(snapshots)
        })
    }

    fn run_task<'a>(&'a self, request: &'a LaunchRequest) -> BoxFuture<'a, Result<RunTaskResult>> {
        Box::pin(async move {
            let network = request.network.as_ref().map(network_to_ecs).transpose()?;

            let mut call = self
                .client
                .run_task()
                .cluster(&request.cluster)
                .task_definition(&request.task_definition)
                .group(request.group.as_str())
                .started_by(&request.started_by)
                .set_platform_version(request.platform_version.clone())
                .set_network_configuration(network);

            match &request.launch_mode {
                Some(LaunchMode::LaunchType(lt)) => {
                    call = call.launch_type(EcsLaunchType::from(lt.as_str()));
                }
                Some(LaunchMode::CapacityProviders(items)) => {
                    for item in items {
                        let entry = CapacityProviderStrategyItem::builder()
                            .capacity_provider(&item.provider)
                            .weight(item.weight)
                            .base(item.base)
                            .build()
                            .map_err(|e| {
                                EcsrunError::Launch(format!("invalid capacity provider strategy: {e}"))
                            })?;
                        call = call.capacity_provider_strategy(entry);
                    }
                }
                None => {}
            }

            if let Some(ov) = &request.container_override {
                let container = EcsContainerOverride::builder()
                    .name(&ov.name)
                    .set_command(Some(ov.command.clone()))
                    .build();
                call = call.overrides(TaskOverride::builder().container_overrides(container).build());
            }

            let out = call.send().await.map_err(|err| sdk_error("RunTask", err))?;

            Ok(RunTaskResult {
                tasks: out
                    .tasks()
                    .iter()
                    .filter_map(|t| t.task_arn())
                    .map(TaskHandle::new)
                    .collect(),
                failures: out
                    .failures()
                    .iter()
                    .map(|f| LaunchFailure {
                        arn: f.arn().map(str::to_string),
                        reason: f.reason().map(str::to_string),
                        detail: f.detail().map(str::to_string),
                    })
                    .collect(),
            })
        })
    }

    fn stop_task<'a>(
        &'a self,
        cluster: &'a str,
        task: &'a TaskHandle,
        reason: &'a str,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            self.client
                .stop_task()
                .cluster(cluster)
                .task(task.as_str())
                .reason(reason)
                .send()
                .await
                .map_err(|err| sdk_error("StopTask", err))?;
            Ok(())
        })
    }
}

fn sdk_error<E, R>(operation: &'static str, err: SdkError<E, R>) -> EcsrunError
where
    E: std::error::Error + Send + Sync + 'static,
    R: std::fmt::Debug + Send + Sync + 'static,
{
    EcsrunError::control_plane(operation, DisplayErrorContext(err).to_string())
}

fn service_from_ecs(cluster: &str, requested: &str, s: &Service) -> Result<ServiceDescriptor> {
    let service_name = s.service_name().unwrap_or(requested).to_string();

    let task_definition = s.task_definition().map(str::to_string).ok_or_else(|| {
        EcsrunError::control_plane(
            "DescribeServices",
            format!("service {service_name} has no task definition"),
        )
    })?;

    let launch_mode = match s.launch_type() {
        Some(lt) => match lt.as_str().parse::<LaunchType>() {
            Ok(lt) => Some(LaunchMode::LaunchType(lt)),
            Err(e) => {
                warn!(service = %service_name, error = %e, "ignoring unrecognised launch type");
                None
            }
        },
        None if !s.capacity_provider_strategy().is_empty() => Some(LaunchMode::CapacityProviders(
            s.capacity_provider_strategy()
                .iter()
                .map(|item| CapacityProviderItem {
                    provider: item.capacity_provider().to_string(),
                    weight: item.weight(),
                    base: item.base(),
                })
                .collect(),
        )),
        None => None,
    };

    let network = s
        .network_configuration()
        .and_then(|n| n.awsvpc_configuration())
        .map(|vpc| NetworkConfiguration {
            subnets: vpc.subnets().to_vec(),
            security_groups: vpc.security_groups().to_vec(),
            assign_public_ip: vpc
                .assign_public_ip()
                .and_then(|a| AssignPublicIp::from_provider(a.as_str())),
        });

    Ok(ServiceDescriptor {
        cluster: cluster.to_string(),
        service_name,
        service_arn: s.service_arn().map(str::to_string),
        task_definition,
        network,
        launch_mode,
        platform_version: s.platform_version().map(str::to_string),
        status: ServiceStatus::from_provider(s.status().unwrap_or_default()),
    })
}

fn task_from_ecs(t: &Task) -> Option<TaskSnapshot> {
    let handle = TaskHandle::new(t.task_arn()?);
    Some(TaskSnapshot {
        handle,
        group: t.group().map(str::to_string),
        last_status: t.last_status().unwrap_or_default().to_string(),
        stop_code: t.stop_code().map(|c| c.as_str().to_string()),
        stopped_reason: t.stopped_reason().map(str::to_string),
        containers: t
            .containers()
            .iter()
            .map(|c| ContainerState {
                name: c.name().unwrap_or_default().to_string(),
                exit_code: c.exit_code(),
                reason: c.reason().map(str::to_string),
            })
            .collect(),
    })
}

fn network_to_ecs(network: &NetworkConfiguration) -> Result<EcsNetworkConfiguration> {
    let security_groups =
        (!network.security_groups.is_empty()).then(|| network.security_groups.clone());

    let vpc = AwsVpcConfiguration::builder()
        .set_subnets(Some(network.subnets.clone()))
        .set_security_groups(security_groups)
        .set_assign_public_ip(
            network
                .assign_public_ip
                .map(|a| EcsAssignPublicIp::from(a.as_str())),
        )
        .build()
        .map_err(|e| EcsrunError::Launch(format!("invalid network configuration: {e}")))?;

    Ok(EcsNetworkConfiguration::builder()
        .awsvpc_configuration(vpc)
        .build())
}
