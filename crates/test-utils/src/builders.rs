#![allow(dead_code)]

use ecsrun::config::{Invocation, InvocationInput};
use ecsrun::errors::Result;
use ecsrun::model::{
    AssignPublicIp, LaunchMode, LaunchType, NetworkConfiguration, ServiceDescriptor, ServiceStatus,
};
use ecsrun::types::{MissingServicePolicy, NetworkPolicy};

/// A typical private-subnet network configuration.
pub fn sample_network() -> NetworkConfiguration {
    NetworkConfiguration {
        subnets: vec!["subnet-0a1b2c3d".to_string(), "subnet-4e5f6a7b".to_string()],
        security_groups: vec!["sg-0123456789abcdef0".to_string()],
        assign_public_ip: Some(AssignPublicIp::Disabled),
    }
}

/// Builder for `ServiceDescriptor` to simplify test setup.
///
/// Defaults: active Fargate service with [`sample_network`] and task
/// definition `<service>:1`.
pub struct ServiceDescriptorBuilder {
    descriptor: ServiceDescriptor,
}

impl ServiceDescriptorBuilder {
    pub fn new(cluster: &str, service: &str) -> Self {
        Self {
            descriptor: ServiceDescriptor {
                cluster: cluster.to_string(),
                service_name: service.to_string(),
                service_arn: Some(format!(
                    "arn:aws:ecs:us-east-1:123456789012:service/{cluster}/{service}"
                )),
                task_definition: format!(
                    "arn:aws:ecs:us-east-1:123456789012:task-definition/{service}:1"
                ),
                network: Some(sample_network()),
                launch_mode: Some(LaunchMode::LaunchType(LaunchType::Fargate)),
                platform_version: None,
                status: ServiceStatus::Active,
            },
        }
    }

    pub fn task_definition(mut self, td: &str) -> Self {
        self.descriptor.task_definition = td.to_string();
        self
    }

    pub fn network(mut self, network: NetworkConfiguration) -> Self {
        self.descriptor.network = Some(network);
        self
    }

    pub fn without_network(mut self) -> Self {
        self.descriptor.network = None;
        self
    }

    pub fn launch_mode(mut self, mode: LaunchMode) -> Self {
        self.descriptor.launch_mode = Some(mode);
        self
    }

    pub fn without_launch_mode(mut self) -> Self {
        self.descriptor.launch_mode = None;
        self
    }

    pub fn platform_version(mut self, pv: &str) -> Self {
        self.descriptor.platform_version = Some(pv.to_string());
        self
    }

    pub fn status(mut self, status: ServiceStatus) -> Self {
        self.descriptor.status = status;
        self
    }

    pub fn build(self) -> ServiceDescriptor {
        self.descriptor
    }
}

/// Builder for `Invocation`, going through the same validation as the CLI.
pub struct InvocationBuilder {
    input: InvocationInput,
}

impl InvocationBuilder {
    pub fn new(cluster: &str, service: &str) -> Self {
        Self {
            input: InvocationInput {
                cluster: Some(cluster.to_string()),
                service: Some(service.to_string()),
                ..InvocationInput::default()
            },
        }
    }

    pub fn slot_label(mut self, label: &str) -> Self {
        self.input.slot_label = Some(label.to_string());
        self
    }

    pub fn wait_for_finish(mut self, val: bool) -> Self {
        self.input.wait_for_finish = Some(val);
        self
    }

    pub fn stop_existing(mut self, val: bool) -> Self {
        self.input.stop_existing = Some(val);
        self
    }

    pub fn override_container(mut self, name: &str) -> Self {
        self.input.override_container = Some(name.to_string());
        self
    }

    pub fn override_command(mut self, args: &[&str]) -> Self {
        self.input.override_command = args.iter().map(|a| a.to_string()).collect();
        self
    }

    pub fn max_wait(mut self, dur: &str) -> Self {
        self.input.max_wait = Some(dur.to_string());
        self
    }

    pub fn poll_interval(mut self, dur: &str) -> Self {
        self.input.poll_interval = Some(dur.to_string());
        self
    }

    pub fn missing_service(mut self, policy: MissingServicePolicy) -> Self {
        self.input.missing_service = Some(policy);
        self
    }

    pub fn network(mut self, policy: NetworkPolicy) -> Self {
        self.input.network = Some(policy);
        self
    }

    pub fn region(mut self, region: &str) -> Self {
        self.input.region = Some(region.to_string());
        self
    }

    pub fn input(self) -> InvocationInput {
        self.input
    }

    pub fn try_build(self) -> Result<Invocation> {
        Invocation::try_from(self.input)
    }

    pub fn build(self) -> Invocation {
        self.try_build()
            .expect("Failed to build valid invocation from builder")
    }
}
