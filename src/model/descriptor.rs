// src/model/descriptor.rs

//! Snapshot of a running service's configuration.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::Deserialize;

/// Capacity type a task is placed on when no capacity provider strategy is
/// used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "UPPERCASE")]
pub enum LaunchType {
    #[value(name = "EC2", alias = "ec2")]
    Ec2,
    #[value(name = "FARGATE", alias = "fargate")]
    Fargate,
    #[value(name = "EXTERNAL", alias = "external")]
    External,
}

impl LaunchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LaunchType::Ec2 => "EC2",
            LaunchType::Fargate => "FARGATE",
            LaunchType::External => "EXTERNAL",
        }
    }
}

impl FromStr for LaunchType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "EC2" => Ok(LaunchType::Ec2),
            "FARGATE" => Ok(LaunchType::Fargate),
            "EXTERNAL" => Ok(LaunchType::External),
            other => Err(format!(
                "invalid launch type: {other} (expected EC2, FARGATE or EXTERNAL)"
            )),
        }
    }
}

impl fmt::Display for LaunchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a capacity provider strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapacityProviderItem {
    pub provider: String,
    pub weight: i32,
    pub base: i32,
}

/// How the service places its tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchMode {
    LaunchType(LaunchType),
    CapacityProviders(Vec<CapacityProviderItem>),
}

impl fmt::Display for LaunchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaunchMode::LaunchType(lt) => write!(f, "{lt}"),
            LaunchMode::CapacityProviders(items) => {
                let names: Vec<_> = items.iter().map(|i| i.provider.as_str()).collect();
                write!(f, "capacity providers [{}]", names.join(", "))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignPublicIp {
    Enabled,
    Disabled,
}

impl AssignPublicIp {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignPublicIp::Enabled => "ENABLED",
            AssignPublicIp::Disabled => "DISABLED",
        }
    }

    /// Map the provider's wire value; unknown values are dropped.
    pub fn from_provider(s: &str) -> Option<Self> {
        match s {
            "ENABLED" => Some(AssignPublicIp::Enabled),
            "DISABLED" => Some(AssignPublicIp::Disabled),
            _ => None,
        }
    }
}

/// VPC networking of a service, copied verbatim onto launched tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfiguration {
    pub subnets: Vec<String>,
    pub security_groups: Vec<String>,
    pub assign_public_ip: Option<AssignPublicIp>,
}

/// Lifecycle status of a service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceStatus {
    Active,
    Draining,
    Inactive,
    Unknown(String),
}

impl ServiceStatus {
    pub fn from_provider(s: &str) -> Self {
        match s {
            "ACTIVE" => ServiceStatus::Active,
            "DRAINING" => ServiceStatus::Draining,
            "INACTIVE" => ServiceStatus::Inactive,
            other => ServiceStatus::Unknown(other.to_string()),
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, ServiceStatus::Active)
    }
}

/// Configuration of one service, read fresh on every invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDescriptor {
    pub cluster: String,
    pub service_name: String,
    pub service_arn: Option<String>,
    /// Task definition reference (ARN or `family:revision`).
    pub task_definition: String,
    pub network: Option<NetworkConfiguration>,
    pub launch_mode: Option<LaunchMode>,
    pub platform_version: Option<String>,
    pub status: ServiceStatus,
}

impl ServiceDescriptor {
    /// True when `name` refers to this service by name or ARN.
    pub fn matches(&self, name: &str) -> bool {
        self.service_name == name || self.service_arn.as_deref() == Some(name)
    }

    /// Task definition family, e.g. `web` for
    /// `arn:aws:ecs:eu-west-1:123:task-definition/web:42`.
    pub fn task_family(&self) -> &str {
        task_family(&self.task_definition)
    }
}

/// Extract the family from a task definition reference.
pub fn task_family(task_definition: &str) -> &str {
    let last = task_definition
        .rsplit('/')
        .next()
        .unwrap_or(task_definition);
    match last.rsplit_once(':') {
        Some((family, revision)) if revision.chars().all(|c| c.is_ascii_digit()) => family,
        _ => last,
    }
}
