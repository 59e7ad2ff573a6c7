// src/errors.rs

//! Crate-wide error type and result alias.
//!
//! Every fatal condition of an invocation surfaces as one `EcsrunError`.
//! A task that stops with a non-zero exit code is *not* an error: it is a
//! `Verdict::Failure` carried in the invocation report.

use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EcsrunError {
    /// Malformed or contradictory input, detected before any remote call.
    #[error("{0}")]
    Validation(String),

    /// Cluster, service or task did not resolve.
    #[error("not found: {0}")]
    NotFound(String),

    /// The control plane rejected the run request.
    #[error("failed to launch task: {0}")]
    Launch(String),

    #[error("task {task} did not stop within {waited:?}; it was left running")]
    Timeout { task: String, waited: Duration },

    /// Interrupted by the user. Remote tasks are never stopped on the way out.
    #[error("cancelled: {0}")]
    Cancelled(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("{operation} failed: {message}")]
    ControlPlane {
        operation: &'static str,
        message: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl EcsrunError {
    pub fn validation(msg: impl Into<String>) -> Self {
        EcsrunError::Validation(msg.into())
    }

    pub fn control_plane(operation: &'static str, message: impl Into<String>) -> Self {
        EcsrunError::ControlPlane {
            operation,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EcsrunError>;
