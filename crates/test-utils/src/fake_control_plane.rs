use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use ecsrun::control::{BoxFuture, ControlPlane};
use ecsrun::errors::{EcsrunError, Result};
use ecsrun::model::{
    ContainerState, LaunchFailure, LaunchRequest, RunTaskResult, ServiceDescriptor, TaskHandle,
    TaskSnapshot, task_family,
};

/// One recorded control plane call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    DescribeServices { cluster: String, service: String },
    ListTasks { cluster: String, family: String },
    DescribeTasks { cluster: String, tasks: Vec<TaskHandle> },
    RunTask(LaunchRequest),
    StopTask { cluster: String, task: TaskHandle, reason: String },
}

/// How a task launched through the fake behaves.
#[derive(Debug, Clone)]
pub enum LaunchScript {
    /// Stop after `polls` status checks with the given exit code and reason.
    Stops {
        polls: u32,
        exit_code: Option<i32>,
        stop_reason: Option<String>,
    },
    /// Keep running forever.
    NeverStops,
    /// Reject the run request with provider-reported failures.
    Rejected(String),
    /// Fail the run request call itself.
    Error(String),
    /// The run request never returns.
    Hangs,
}

impl LaunchScript {
    pub fn exits_with(code: i32) -> Self {
        LaunchScript::Stops {
            polls: 1,
            exit_code: Some(code),
            stop_reason: (code != 0).then(|| "Essential container in task exited".to_string()),
        }
    }
}

#[derive(Debug, Clone)]
struct FakeTask {
    cluster: String,
    family: String,
    snapshot: TaskSnapshot,
    /// Status checks left before the task stops; `None` never stops.
    polls_left: Option<u32>,
    final_exit_code: Option<i32>,
    final_stop_reason: Option<String>,
}

#[derive(Debug)]
struct FakeState {
    services: Vec<ServiceDescriptor>,
    tasks: Vec<FakeTask>,
    calls: Vec<Call>,
    failing_stops: HashSet<TaskHandle>,
    launch: LaunchScript,
    next_id: u32,
}

/// Scriptable in-memory control plane.
///
/// Cloning shares state, so a test can keep a handle for assertions while
/// the pipeline owns another.
#[derive(Debug, Clone)]
pub struct FakeControlPlane {
    state: Arc<Mutex<FakeState>>,
}

impl Default for FakeControlPlane {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeControlPlane {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeState {
                services: Vec::new(),
                tasks: Vec::new(),
                calls: Vec::new(),
                failing_stops: HashSet::new(),
                launch: LaunchScript::exits_with(0),
                next_id: 1,
            })),
        }
    }

    pub fn with_service(self, descriptor: ServiceDescriptor) -> Self {
        self.state.lock().unwrap().services.push(descriptor);
        self
    }

    /// Add an already-running task of `family` tagged with `group`.
    pub fn add_running_task(&self, cluster: &str, family: &str, group: &str) -> TaskHandle {
        let mut state = self.state.lock().unwrap();
        let handle = next_handle(&mut state, cluster);
        state.tasks.push(FakeTask {
            cluster: cluster.to_string(),
            family: family.to_string(),
            snapshot: running_snapshot(&handle, group),
            polls_left: None,
            final_exit_code: None,
            final_stop_reason: None,
        });
        handle
    }

    /// Make stop requests for `task` fail.
    pub fn fail_stop_for(&self, task: &TaskHandle) {
        self.state.lock().unwrap().failing_stops.insert(task.clone());
    }

    pub fn on_launch(self, script: LaunchScript) -> Self {
        self.state.lock().unwrap().launch = script;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn run_requests(&self) -> Vec<LaunchRequest> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::RunTask(req) => Some(req),
                _ => None,
            })
            .collect()
    }

    pub fn stop_requests(&self) -> Vec<TaskHandle> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::StopTask { task, .. } => Some(task),
                _ => None,
            })
            .collect()
    }

    /// Current status of a task known to the fake.
    pub fn status_of(&self, task: &TaskHandle) -> Option<String> {
        let state = self.state.lock().unwrap();
        state
            .tasks
            .iter()
            .find(|t| &t.snapshot.handle == task)
            .map(|t| t.snapshot.last_status.clone())
    }

    fn record(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }
}

impl ControlPlane for FakeControlPlane {
    fn describe_services<'a>(
        &'a self,
        cluster: &'a str,
        service: &'a str,
    ) -> BoxFuture<'a, Result<Vec<ServiceDescriptor>>> {
        self.record(Call::DescribeServices {
            cluster: cluster.to_string(),
            service: service.to_string(),
        });

        let found: Vec<_> = {
            let state = self.state.lock().unwrap();
            state
                .services
                .iter()
                .filter(|d| d.cluster == cluster && d.matches(service))
                .cloned()
                .collect()
        };

        Box::pin(async move { Ok(found) })
    }

    fn list_tasks<'a>(
        &'a self,
        cluster: &'a str,
        family: &'a str,
    ) -> BoxFuture<'a, Result<Vec<TaskHandle>>> {
        self.record(Call::ListTasks {
            cluster: cluster.to_string(),
            family: family.to_string(),
        });

        let handles: Vec<_> = {
            let state = self.state.lock().unwrap();
            state
                .tasks
                .iter()
                .filter(|t| t.cluster == cluster && t.family == family && !t.snapshot.is_stopped())
                .map(|t| t.snapshot.handle.clone())
                .collect()
        };

        Box::pin(async move { Ok(handles) })
    }

    fn describe_tasks<'a>(
        &'a self,
        cluster: &'a str,
        tasks: &'a [TaskHandle],
    ) -> BoxFuture<'a, Result<Vec<TaskSnapshot>>> {
        self.record(Call::DescribeTasks {
            cluster: cluster.to_string(),
            tasks: tasks.to_vec(),
        });

        let snapshots: Vec<_> = {
            let mut state = self.state.lock().unwrap();
            state
                .tasks
                .iter_mut()
                .filter(|t| t.cluster == cluster && tasks.contains(&t.snapshot.handle))
                .map(|t| {
                    advance(t);
                    t.snapshot.clone()
                })
                .collect()
        };

        Box::pin(async move { Ok(snapshots) })
    }

    fn run_task<'a>(&'a self, request: &'a LaunchRequest) -> BoxFuture<'a, Result<RunTaskResult>> {
        self.record(Call::RunTask(request.clone()));

        let result = {
            let mut state = self.state.lock().unwrap();
            match state.launch.clone() {
                LaunchScript::Hangs => return Box::pin(std::future::pending()),
                LaunchScript::Error(msg) => Err(EcsrunError::control_plane("RunTask", msg)),
                LaunchScript::Rejected(reason) => Ok(RunTaskResult {
                    tasks: Vec::new(),
                    failures: vec![LaunchFailure {
                        arn: None,
                        reason: Some(reason),
                        detail: None,
                    }],
                }),
                script => {
                    let handle = next_handle(&mut state, &request.cluster);
                    let mut snapshot = running_snapshot(&handle, request.group.as_str());
                    snapshot.last_status = "PROVISIONING".to_string();
                    let (polls_left, final_exit_code, final_stop_reason) = match script {
                        LaunchScript::Stops {
                            polls,
                            exit_code,
                            stop_reason,
                        } => (Some(polls), exit_code, stop_reason),
                        _ => (None, None, None),
                    };
                    state.tasks.push(FakeTask {
                        cluster: request.cluster.clone(),
                        family: task_family(&request.task_definition).to_string(),
                        snapshot,
                        polls_left,
                        final_exit_code,
                        final_stop_reason,
                    });
                    Ok(RunTaskResult {
                        tasks: vec![handle],
                        failures: Vec::new(),
                    })
                }
            }
        };

        Box::pin(async move { result })
    }

    fn stop_task<'a>(
        &'a self,
        cluster: &'a str,
        task: &'a TaskHandle,
        reason: &'a str,
    ) -> BoxFuture<'a, Result<()>> {
        self.record(Call::StopTask {
            cluster: cluster.to_string(),
            task: task.clone(),
            reason: reason.to_string(),
        });

        let result = {
            let mut state = self.state.lock().unwrap();
            if state.failing_stops.contains(task) {
                Err(EcsrunError::control_plane("StopTask", format!("access denied for {task}")))
            } else {
                if let Some(t) = state.tasks.iter_mut().find(|t| &t.snapshot.handle == task) {
                    t.snapshot.last_status = "STOPPED".to_string();
                    t.snapshot.stop_code = Some("UserInitiated".to_string());
                    t.snapshot.stopped_reason = Some(reason.to_string());
                }
                Ok(())
            }
        };

        Box::pin(async move { result })
    }
}

fn next_handle(state: &mut FakeState, cluster: &str) -> TaskHandle {
    let id = state.next_id;
    state.next_id += 1;
    TaskHandle::new(format!(
        "arn:aws:ecs:us-east-1:123456789012:task/{cluster}/{id:032x}"
    ))
}

fn running_snapshot(handle: &TaskHandle, group: &str) -> TaskSnapshot {
    TaskSnapshot {
        handle: handle.clone(),
        group: Some(group.to_string()),
        last_status: "RUNNING".to_string(),
        stop_code: None,
        stopped_reason: None,
        containers: vec![ContainerState {
            name: "app".to_string(),
            exit_code: None,
            reason: None,
        }],
    }
}

/// Move a launched task one status check closer to its scripted end.
fn advance(task: &mut FakeTask) {
    if task.snapshot.is_stopped() {
        return;
    }
    match task.polls_left {
        Some(0) | Some(1) => {
            task.polls_left = Some(0);
            task.snapshot.last_status = "STOPPED".to_string();
            task.snapshot.stop_code = Some("EssentialContainerExited".to_string());
            task.snapshot.stopped_reason = task.final_stop_reason.clone();
            for c in task.snapshot.containers.iter_mut() {
                c.exit_code = task.final_exit_code;
            }
        }
        Some(n) => {
            task.polls_left = Some(n - 1);
            task.snapshot.last_status = "RUNNING".to_string();
        }
        None => {
            task.snapshot.last_status = "RUNNING".to_string();
        }
    }
}
