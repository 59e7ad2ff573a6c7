// src/report.rs

//! Invocation results and their `key=value` output rendering.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::errors::Result;
use crate::model::TaskHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationStatus {
    /// The task stopped with exit code 0.
    Success,
    /// The task stopped with a non-zero or missing exit code.
    Failure,
    /// The task was launched and not waited for.
    Launched,
    /// The service was missing and the skip policy applied.
    Skipped,
    /// Dry run: the request was built but not submitted.
    Planned,
}

impl InvocationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvocationStatus::Success => "success",
            InvocationStatus::Failure => "failure",
            InvocationStatus::Launched => "launched",
            InvocationStatus::Skipped => "skipped",
            InvocationStatus::Planned => "planned",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationReport {
    pub status: InvocationStatus,
    pub task_definition: Option<String>,
    pub task: Option<TaskHandle>,
    pub exit_code: Option<i32>,
    /// Failure message (the stop reason) for a failed task.
    pub message: Option<String>,
    pub console_url: Option<String>,
    /// Tasks a stop request was issued for while vacating the slot.
    pub replaced: Vec<TaskHandle>,
}

impl InvocationReport {
    pub fn new(status: InvocationStatus) -> Self {
        Self {
            status,
            task_definition: None,
            task: None,
            exit_code: None,
            message: None,
            console_url: None,
            replaced: Vec::new(),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.status == InvocationStatus::Failure
    }

    /// Output pairs in a stable order; absent values are left out.
    pub fn outputs(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        if let Some(td) = &self.task_definition {
            out.push(("task-definition", td.clone()));
        }
        if let Some(task) = &self.task {
            out.push(("task-arn", task.to_string()));
        }
        out.push(("status", self.status.as_str().to_string()));
        if let Some(code) = self.exit_code {
            out.push(("exit-code", code.to_string()));
        }
        if let Some(url) = &self.console_url {
            out.push(("console-url", url.clone()));
        }
        out
    }

    pub fn write_outputs<W: Write>(&self, mut w: W) -> std::io::Result<()> {
        for (key, value) in self.outputs() {
            writeln!(w, "{key}={}", single_line(&value))?;
        }
        Ok(())
    }

    /// Append the outputs to a file such as the one named by `GITHUB_OUTPUT`.
    pub fn append_to_file(&self, path: &Path) -> Result<()> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        self.write_outputs(file)?;
        Ok(())
    }
}

fn single_line(s: &str) -> String {
    s.replace(['\r', '\n'], " ")
}
