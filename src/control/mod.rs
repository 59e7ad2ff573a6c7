// src/control/mod.rs

//! Task-orchestration control plane abstraction.
//!
//! The launch pipeline talks to a `ControlPlane` instead of an SDK client.
//! Production code uses [`EcsControlPlane`]; tests provide a fake that
//! scripts services and task lifecycles and records every call.
//!
//! Implementations own their transport and retry behaviour. Responses are
//! converted into the typed snapshots of [`crate::model`] at this boundary,
//! so missing provider fields show up as `Option`s, never as defaults.

use std::future::Future;
use std::pin::Pin;

use crate::errors::Result;
use crate::model::{LaunchRequest, RunTaskResult, ServiceDescriptor, TaskHandle, TaskSnapshot};

pub mod ecs;

pub use ecs::EcsControlPlane;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait ControlPlane: Send + Sync {
    /// Describe `service` in `cluster`.
    ///
    /// An unknown service yields an empty list, not an error; an unknown
    /// cluster yields `NotFound`.
    fn describe_services<'a>(
        &'a self,
        cluster: &'a str,
        service: &'a str,
    ) -> BoxFuture<'a, Result<Vec<ServiceDescriptor>>>;

    /// All tasks of a task definition family in the cluster, across pages.
    fn list_tasks<'a>(
        &'a self,
        cluster: &'a str,
        family: &'a str,
    ) -> BoxFuture<'a, Result<Vec<TaskHandle>>>;

    /// Current state of the given tasks. Handles the provider no longer
    /// knows about are absent from the result.
    fn describe_tasks<'a>(
        &'a self,
        cluster: &'a str,
        tasks: &'a [TaskHandle],
    ) -> BoxFuture<'a, Result<Vec<TaskSnapshot>>>;

    fn run_task<'a>(&'a self, request: &'a LaunchRequest) -> BoxFuture<'a, Result<RunTaskResult>>;

    fn stop_task<'a>(
        &'a self,
        cluster: &'a str,
        task: &'a TaskHandle,
        reason: &'a str,
    ) -> BoxFuture<'a, Result<()>>;
}

impl<T: ControlPlane + ?Sized> ControlPlane for &T {
    fn describe_services<'a>(
        &'a self,
        cluster: &'a str,
        service: &'a str,
    ) -> BoxFuture<'a, Result<Vec<ServiceDescriptor>>> {
        (**self).describe_services(cluster, service)
    }

    fn list_tasks<'a>(
        &'a self,
        cluster: &'a str,
        family: &'a str,
    ) -> BoxFuture<'a, Result<Vec<TaskHandle>>> {
        (**self).list_tasks(cluster, family)
    }

    fn describe_tasks<'a>(
        &'a self,
        cluster: &'a str,
        tasks: &'a [TaskHandle],
    ) -> BoxFuture<'a, Result<Vec<TaskSnapshot>>> {
        (**self).describe_tasks(cluster, tasks)
    }

    fn run_task<'a>(&'a self, request: &'a LaunchRequest) -> BoxFuture<'a, Result<RunTaskResult>> {
        (**self).run_task(request)
    }

    fn stop_task<'a>(
        &'a self,
        cluster: &'a str,
        task: &'a TaskHandle,
        reason: &'a str,
    ) -> BoxFuture<'a, Result<()>> {
        (**self).stop_task(cluster, task, reason)
    }
}
