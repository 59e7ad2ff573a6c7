// src/lib.rs

pub mod cli;
pub mod config;
pub mod control;
pub mod engine;
pub mod errors;
pub mod logging;
pub mod model;
pub mod report;
pub mod types;

use std::path::Path;

use anyhow::Result;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::{Invocation, load_and_validate};
use crate::control::{ControlPlane, EcsControlPlane};
use crate::engine::{LaunchPlan, Pipeline};
use crate::errors::EcsrunError;
use crate::report::{InvocationReport, InvocationStatus};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config file loading and the CLI/file merge
/// - AWS SDK configuration and the ECS control plane
/// - Ctrl-C handling (stops observing, never stops the remote task)
/// - the launch pipeline and output emission
pub async fn run(args: CliArgs) -> Result<InvocationReport> {
    let file = match &args.config {
        Some(path) => Some(load_and_validate(path)?),
        None => None,
    };

    let mut input = args.to_input();
    if let Some(cfg) = &file {
        input = input.or(cfg.to_input());
    }
    let mut invocation = Invocation::try_from(input)?;

    let sdk_config = load_sdk_config(invocation.region.as_deref()).await;
    if invocation.region.is_none() {
        invocation.region = sdk_config.region().map(ToString::to_string);
    }
    let control = EcsControlPlane::from_conf(&sdk_config);

    // Ctrl-C → stop observing.
    let cancel = CancellationToken::new();
    {
        let token = cancel.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            info!("Ctrl+C received; cancelling");
            token.cancel();
        });
    }

    let pipeline = Pipeline::new(control).with_cancellation(cancel.clone());

    if args.dry_run {
        let plan = pipeline.plan(&invocation).await?;
        print_dry_run(&invocation, plan.as_ref());
        let mut report = InvocationReport::new(if plan.is_some() {
            InvocationStatus::Planned
        } else {
            InvocationStatus::Skipped
        });
        report.task_definition = plan.map(|p| p.request.task_definition);
        emit_outputs(&report, args.output_file.as_deref())?;
        return Ok(report);
    }

    let report = run_pipeline(&pipeline, &invocation, args.output_file.as_deref()).await?;
    Ok(report)
}

/// Run `invocation` and emit its outputs.
///
/// Outputs are written whether or not the run succeeds, so a task that was
/// launched before a timeout or an interruption is still reported. When
/// the pipeline's cancellation token fires outside the wait, the run is
/// abandoned with `Cancelled`.
pub async fn run_pipeline<C: ControlPlane>(
    pipeline: &Pipeline<C>,
    invocation: &Invocation,
    output_file: Option<&Path>,
) -> errors::Result<InvocationReport> {
    let mut report = InvocationReport::new(InvocationStatus::Launched);

    let result = tokio::select! {
        biased;
        res = pipeline.run_into(invocation, &mut report) => res,
        _ = pipeline.cancellation().cancelled() => Err(EcsrunError::Cancelled(
            "interrupted before the launched task could be observed".to_string(),
        )),
    };

    if let Err(err) = &result {
        if report.task.is_none() && matches!(err, EcsrunError::Cancelled(_)) {
            warn!(
                slot = %invocation.slot,
                "interrupted while a run request may be in flight; check the cluster for a task in this slot"
            );
        }
        report.status = InvocationStatus::Failure;
        report.message = Some(err.to_string());
    }

    emit_outputs(&report, output_file)?;
    result.map(|()| report)
}

async fn load_sdk_config(region: Option<&str>) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = region {
        loader = loader.region(Region::new(region.to_string()));
    }
    loader.load().await
}

/// Print outputs on stdout and, if configured, append them to `output_file`.
fn emit_outputs(report: &InvocationReport, output_file: Option<&Path>) -> errors::Result<()> {
    report.write_outputs(std::io::stdout().lock())?;
    if let Some(path) = output_file {
        debug!(path = %path.display(), "appending outputs");
        report.append_to_file(path)?;
    }
    Ok(())
}

/// Dry-run output: the resolved service and the request that would be sent.
fn print_dry_run(invocation: &Invocation, plan: Option<&LaunchPlan>) {
    println!("ecsrun dry-run");
    println!("  cluster = {}", invocation.cluster);
    println!("  service = {}", invocation.service);
    println!("  group = {}", invocation.slot);
    println!("  stop_existing = {}", invocation.stop_existing);
    println!("  wait_for_finish = {}", invocation.wait_for_finish);
    if invocation.wait_for_finish {
        println!("  max_wait = {:?}", invocation.wait.max_wait);
        println!("  poll_interval = {:?}", invocation.wait.poll_interval);
    }
    println!();

    let Some(plan) = plan else {
        println!("service not found; nothing would be launched");
        return;
    };

    let request = &plan.request;
    println!("run request:");
    println!("  task_definition: {}", request.task_definition);
    match &request.launch_mode {
        Some(mode) => println!("  launch_mode: {mode}"),
        None => println!("  launch_mode: (cluster default)"),
    }
    if let Some(pv) = &request.platform_version {
        println!("  platform_version: {pv}");
    }
    match &request.network {
        Some(net) => {
            println!("  subnets: {:?}", net.subnets);
            if !net.security_groups.is_empty() {
                println!("  security_groups: {:?}", net.security_groups);
            }
            if let Some(ip) = net.assign_public_ip {
                println!("  assign_public_ip: {}", ip.as_str());
            }
        }
        None => println!("  network: (none)"),
    }
    if let Some(ov) = &request.container_override {
        println!("  override: {} -> {:?}", ov.name, ov.command);
    }

    debug!("dry-run complete (nothing launched)");
}
