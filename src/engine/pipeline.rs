// src/engine/pipeline.rs

//! One invocation, end to end.
//!
//! fetch -> build -> (reconcile) -> launch -> (wait) -> classify
//!
//! Data only flows forward. The pipeline owns its control plane explicitly;
//! there is no shared client state between invocations.

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::Invocation;
use crate::control::ControlPlane;
use crate::errors::Result;
use crate::model::{LaunchRequest, ServiceDescriptor};
use crate::report::{InvocationReport, InvocationStatus};

use super::builder::build_launch_request;
use super::classify::{TaskOutcome, Verdict, classify, console_url};
use super::fetch::fetch_service;
use super::launch::launch_task;
use super::reconcile::reconcile_slot;
use super::wait::wait_for_stop;

/// Region shown in console links when none is configured.
pub const DEFAULT_REGION: &str = "us-east-1";

/// The service snapshot and the request derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    pub descriptor: ServiceDescriptor,
    pub request: LaunchRequest,
}

#[derive(Debug)]
pub struct Pipeline<C: ControlPlane> {
    control: C,
    cancel: CancellationToken,
}

impl<C: ControlPlane> Pipeline<C> {
    pub fn new(control: C) -> Self {
        Self {
            control,
            cancel: CancellationToken::new(),
        }
    }

    /// Stop observing (not the remote task) once `cancel` fires.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn control(&self) -> &C {
        &self.control
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Fetch the service and build the run request, without side effects.
    ///
    /// `Ok(None)` means the service is missing and the skip policy applies.
    pub async fn plan(&self, invocation: &Invocation) -> Result<Option<LaunchPlan>> {
        let Some(descriptor) = fetch_service(
            &self.control,
            &invocation.cluster,
            &invocation.service,
            &invocation.fetch,
        )
        .await?
        else {
            return Ok(None);
        };

        let request = build_launch_request(&descriptor, &invocation.overrides, &invocation.slot)?;
        Ok(Some(LaunchPlan {
            descriptor,
            request,
        }))
    }

    pub async fn run(&self, invocation: &Invocation) -> Result<InvocationReport> {
        let mut report = InvocationReport::new(InvocationStatus::Launched);
        self.run_into(invocation, &mut report).await?;
        Ok(report)
    }

    /// Like [`Pipeline::run`], but records progress into `report` as it
    /// goes.
    ///
    /// On error, `report` still holds what was known at that point: the
    /// task definition once the request is built, and the task handle and
    /// console link once the task is launched.
    pub async fn run_into(&self, invocation: &Invocation, report: &mut InvocationReport) -> Result<()> {
        let Some(LaunchPlan { descriptor, request }) = self.plan(invocation).await? else {
            report.status = InvocationStatus::Skipped;
            return Ok(());
        };

        report.status = InvocationStatus::Launched;
        report.task_definition = Some(request.task_definition.clone());

        let reconciled = reconcile_slot(
            &self.control,
            &invocation.cluster,
            descriptor.task_family(),
            &invocation.slot,
            invocation.stop_existing,
            &invocation.stop_reason,
        )
        .await?;
        report.replaced = reconciled.stopped;

        let task = launch_task(&self.control, &request).await?;
        let region = invocation.region.as_deref().unwrap_or(DEFAULT_REGION);
        let url = console_url(
            &invocation.console_url_template,
            region,
            &invocation.cluster,
            &task,
        );
        info!(task = %task, url = %url, "task logs on the ECS console");

        report.task = Some(task.clone());
        report.console_url = Some(url);

        if !invocation.wait_for_finish {
            return Ok(());
        }

        let snapshot = wait_for_stop(
            &self.control,
            &invocation.cluster,
            &task,
            &invocation.wait,
            &self.cancel,
        )
        .await?;

        let outcome = TaskOutcome::from_snapshot(&snapshot, invocation.overrides.container());
        report.exit_code = outcome.exit_code;

        match classify(&outcome) {
            Verdict::Success => {
                info!(task = %task, "task succeeded");
                report.status = InvocationStatus::Success;
            }
            Verdict::Failure(reason) => {
                warn!(task = %task, exit_code = ?outcome.exit_code, reason = %reason, "task failed");
                report.status = InvocationStatus::Failure;
                report.message = Some(reason);
            }
        }

        Ok(())
    }
}
