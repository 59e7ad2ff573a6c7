// src/engine/mod.rs

//! Launch pipeline for ephemeral tasks.
//!
//! - [`fetch`] resolves the service into a [`ServiceDescriptor`].
//! - [`builder`] turns it into a [`LaunchRequest`] (pure).
//! - [`reconcile`] vacates the logical slot when replacement is requested.
//! - [`launch`] submits the request.
//! - [`wait`] polls until the task stops, bounded and cancellable.
//! - [`classify`] turns the terminal state into a [`Verdict`].
//! - [`pipeline`] runs them in order for one invocation.
//!
//! [`ServiceDescriptor`]: crate::model::ServiceDescriptor
//! [`LaunchRequest`]: crate::model::LaunchRequest

pub mod builder;
pub mod classify;
pub mod fetch;
pub mod launch;
pub mod pipeline;
pub mod reconcile;
pub mod wait;

pub use builder::build_launch_request;
pub use classify::{TaskOutcome, Verdict, classify, console_url};
pub use fetch::{FetchPolicy, fetch_service};
pub use launch::launch_task;
pub use pipeline::{LaunchPlan, Pipeline};
pub use reconcile::{ReconcileReport, reconcile_slot};
pub use wait::{WaitOptions, wait_for_stop};
