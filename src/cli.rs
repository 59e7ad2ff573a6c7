// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! Boolean inputs accept an explicit value (`--wait-for-finish false`) so the
//! binary can be driven from CI inputs that are always passed as strings.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::InvocationInput;
use crate::model::LaunchType;
use crate::types::{MissingServicePolicy, NetworkPolicy};

/// Command-line arguments for `ecsrun`.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "ecsrun",
    version,
    about = "Run a one-off ECS task with the network and launch settings of a running service.",
    long_about = None
)]
pub struct CliArgs {
    /// Cluster that hosts the service.
    #[arg(long, value_name = "NAME")]
    pub cluster: Option<String>,

    /// Service whose configuration is mirrored (name or ARN).
    #[arg(long, value_name = "NAME")]
    pub service: Option<String>,

    /// Label of the logical slot; the task group becomes `<label>:<service>`.
    #[arg(long, visible_alias = "group-suffix", value_name = "LABEL")]
    pub slot_label: Option<String>,

    /// Wait until the task stops and fail if it did not exit with code 0.
    #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true")]
    pub wait_for_finish: Option<bool>,

    /// Stop tasks already running in the same slot before launching.
    #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true")]
    pub stop_existing: Option<bool>,

    /// Container whose command is overridden.
    #[arg(long, value_name = "NAME")]
    pub override_container: Option<String>,

    /// Replacement command, one argument per line. May be repeated.
    #[arg(long, value_name = "ARGS")]
    pub override_container_command: Vec<String>,

    /// Upper bound on the wait (e.g. `30m`, `1h`).
    #[arg(long, value_name = "DURATION")]
    pub max_wait: Option<String>,

    /// Delay between status checks while waiting (e.g. `6s`).
    #[arg(long, value_name = "DURATION")]
    pub poll_interval: Option<String>,

    /// Behaviour when the service is missing or not active.
    #[arg(long, value_enum, value_name = "POLICY")]
    pub missing_service: Option<MissingServicePolicy>,

    /// Whether the service must have a network configuration.
    #[arg(long, value_enum, value_name = "POLICY")]
    pub network: Option<NetworkPolicy>,

    /// Launch type used when the service reports none.
    #[arg(long, value_enum, value_name = "TYPE")]
    pub launch_type: Option<LaunchType>,

    /// AWS region; defaults to the SDK's region resolution.
    #[arg(long, value_name = "REGION")]
    pub region: Option<String>,

    /// Optional TOML config file providing defaults for the flags above.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// File that `key=value` outputs are appended to.
    #[arg(long, value_name = "PATH", env = "GITHUB_OUTPUT")]
    pub output_file: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `ECSRUN_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Describe the service and print the run request, but launch nothing.
    #[arg(long)]
    pub dry_run: bool,
}

impl CliArgs {
    /// Lower the flags into invocation parameters.
    pub fn to_input(&self) -> InvocationInput {
        InvocationInput {
            cluster: self.cluster.clone(),
            service: self.service.clone(),
            slot_label: self.slot_label.clone(),
            wait_for_finish: self.wait_for_finish,
            stop_existing: self.stop_existing,
            override_container: self.override_container.clone(),
            override_command: split_command_lines(&self.override_container_command),
            max_wait: self.max_wait.clone(),
            poll_interval: self.poll_interval.clone(),
            missing_service: self.missing_service,
            network: self.network,
            launch_type: self.launch_type,
            stop_reason: None,
            region: self.region.clone(),
            console_url_template: None,
        }
    }
}

/// Split multi-line values into one argument per line, trimming each line
/// and dropping blank ones.
pub fn split_command_lines(values: &[String]) -> Vec<String> {
    values
        .iter()
        .flat_map(|v| v.lines())
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
