// src/config/model.rs

use serde::Deserialize;

use crate::config::invocation::InvocationInput;
use crate::model::LaunchType;
use crate::types::{MissingServicePolicy, NetworkPolicy};

/// Configuration file as read from TOML, before validation.
///
/// ```toml
/// [invocation]
/// cluster = "prod"
/// service = "web"
/// slot_label = "migrate"
/// wait_for_finish = true
/// override_container = "app"
/// override_command = ["bin/rails", "db:migrate"]
///
/// [wait]
/// max_wait = "30m"
/// poll_interval = "10s"
///
/// [policy]
/// missing_service = "skip"
/// network = "required"
///
/// [console]
/// region = "eu-west-1"
/// ```
///
/// All sections are optional; command-line flags take precedence.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub invocation: InvocationSection,

    #[serde(default)]
    pub wait: WaitSection,

    #[serde(default)]
    pub policy: PolicySection,

    #[serde(default)]
    pub console: ConsoleSection,
}

/// `[invocation]` section: defaults for the invocation parameters.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InvocationSection {
    pub cluster: Option<String>,
    pub service: Option<String>,
    pub slot_label: Option<String>,
    pub wait_for_finish: Option<bool>,
    pub stop_existing: Option<bool>,
    pub override_container: Option<String>,
    #[serde(default)]
    pub override_command: Vec<String>,
    /// Used when the service reports no launch type or capacity providers.
    pub launch_type: Option<LaunchType>,
}

/// `[wait]` section. Durations are strings such as `"90s"` or `"1m30s"`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WaitSection {
    pub max_wait: Option<String>,
    pub poll_interval: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicySection {
    pub missing_service: Option<MissingServicePolicy>,
    pub network: Option<NetworkPolicy>,
    pub stop_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConsoleSection {
    pub region: Option<String>,
    /// Link template with `{region}`, `{cluster}` and `{task}` placeholders.
    pub url_template: Option<String>,
}

/// Validated configuration file.
#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
    pub invocation: InvocationSection,
    pub wait: WaitSection,
    pub policy: PolicySection,
    pub console: ConsoleSection,
}

impl ConfigFile {
    /// Construct without validation; use `ConfigFile::try_from(raw)` instead.
    pub(crate) fn new_unchecked(raw: RawConfigFile) -> Self {
        Self {
            invocation: raw.invocation,
            wait: raw.wait,
            policy: raw.policy,
            console: raw.console,
        }
    }

    /// Lower into invocation parameters, to be merged under CLI values.
    pub fn to_input(&self) -> InvocationInput {
        InvocationInput {
            cluster: self.invocation.cluster.clone(),
            service: self.invocation.service.clone(),
            slot_label: self.invocation.slot_label.clone(),
            wait_for_finish: self.invocation.wait_for_finish,
            stop_existing: self.invocation.stop_existing,
            override_container: self.invocation.override_container.clone(),
            override_command: self.invocation.override_command.clone(),
            max_wait: self.wait.max_wait.clone(),
            poll_interval: self.wait.poll_interval.clone(),
            missing_service: self.policy.missing_service,
            network: self.policy.network,
            launch_type: self.invocation.launch_type,
            stop_reason: self.policy.stop_reason.clone(),
            region: self.console.region.clone(),
            console_url_template: self.console.url_template.clone(),
        }
    }
}
