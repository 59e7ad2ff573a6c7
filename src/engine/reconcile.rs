// src/engine/reconcile.rs

//! Vacate a logical slot before a new task is launched into it.

use tracing::{debug, info, warn};

use crate::control::ControlPlane;
use crate::errors::Result;
use crate::model::{LogicalSlot, TaskHandle};

/// What reconciliation did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Tasks found occupying the slot.
    pub matched: Vec<TaskHandle>,
    /// Tasks a stop request was accepted for.
    pub stopped: Vec<TaskHandle>,
    /// Tasks whose stop request failed, with the error message.
    pub failed: Vec<(TaskHandle, String)>,
}

/// Stop every live task of `family` in `cluster` whose group equals `slot`.
///
/// A no-op when `replace` is false. Stop requests are issued one at a time
/// and a failure for one task is logged and skipped. The stopped tasks are
/// not waited for. Listing and describing failures are fatal.
pub async fn reconcile_slot<C: ControlPlane>(
    control: &C,
    cluster: &str,
    family: &str,
    slot: &LogicalSlot,
    replace: bool,
    stop_reason: &str,
) -> Result<ReconcileReport> {
    let mut report = ReconcileReport::default();

    if !replace {
        debug!(%slot, "stop-existing disabled; leaving slot untouched");
        return Ok(report);
    }

    let handles = control.list_tasks(cluster, family).await?;
    if handles.is_empty() {
        debug!(cluster, family, %slot, "no tasks in family; slot already free");
        return Ok(report);
    }

    let snapshots = control.describe_tasks(cluster, &handles).await?;
    report.matched = snapshots
        .into_iter()
        .filter(|t| t.in_group(slot.as_str()) && !t.is_stopped())
        .map(|t| t.handle)
        .collect();

    info!(
        cluster,
        %slot,
        count = report.matched.len(),
        "stopping tasks occupying slot"
    );

    for handle in &report.matched {
        match control.stop_task(cluster, handle, stop_reason).await {
            Ok(()) => {
                debug!(task = %handle, "stop requested");
                report.stopped.push(handle.clone());
            }
            Err(err) => {
                warn!(task = %handle, error = %err, "failed to stop task; continuing");
                report.failed.push((handle.clone(), err.to_string()));
            }
        }
    }

    Ok(report)
}
