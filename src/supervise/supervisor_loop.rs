// src/supervise/supervisor_loop.rs

//! Main supervisor loop that owns all live child handles.

use std::collections::HashMap;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::runtime::{RuntimeEvent, TaskId};
use crate::supervise::child_runner::run_child;
use crate::supervise::launch::LaunchOptions;
use crate::task::state::TaskSpec;

/// Requests the runtime sends to the supervisor loop.
#[derive(Debug)]
pub enum SupervisorRequest {
    /// Spawn and supervise the child process for this task.
    Start(TaskSpec),
    /// Terminate the child owned by this task identifier (idempotent).
    Stop(TaskId),
    /// Terminate every live child, acknowledge once all runners finished.
    StopAll(oneshot::Sender<()>),
}

/// Internal handle for a currently-supervised child process.
///
/// - `kill` requests that the child be stopped (kill command or shutdown).
/// - `handle` is the Tokio task actually running the child.
///
/// This is the only place a child handle lives: exactly one owner per task
/// identifier, never shared.
struct ActiveChild {
    kill: Option<oneshot::Sender<()>>,
    handle: tokio::task::JoinHandle<()>,
}

/// Spawn the background supervisor loop.
///
/// The returned `mpsc::Sender<SupervisorRequest>` is what the runtime (via
/// `RealSupervisorBackend`) uses to start and stop children. Per task
/// identifier there is never more than one live child at a time; the core
/// rejects duplicate launches before they reach this loop, and the loop
/// enforces the same invariant as a backstop.
pub fn spawn_supervisor(
    runtime_tx: mpsc::Sender<RuntimeEvent>,
    options: LaunchOptions,
) -> mpsc::Sender<SupervisorRequest> {
    let (tx, mut rx) = mpsc::channel::<SupervisorRequest>(32);

    tokio::spawn(async move {
        info!("supervisor loop started");

        // At most one ActiveChild per task identifier.
        let mut active: HashMap<TaskId, ActiveChild> = HashMap::new();

        while let Some(request) = rx.recv().await {
            match request {
                SupervisorRequest::Start(spec) => {
                    handle_start(spec, &options, &mut active, &runtime_tx);
                }
                SupervisorRequest::Stop(task) => {
                    handle_stop(&task, &mut active);
                }
                SupervisorRequest::StopAll(ack) => {
                    handle_stop_all(&mut active).await;
                    let _ = ack.send(());
                    break;
                }
            }
        }

        info!("supervisor loop finished");
    });

    tx
}

/// Start supervising a new child process.
fn handle_start(
    spec: TaskSpec,
    options: &LaunchOptions,
    active: &mut HashMap<TaskId, ActiveChild>,
    runtime_tx: &mpsc::Sender<RuntimeEvent>,
) {
    let task_id = spec.task_id.clone();

    if let Some(existing) = active.get(&task_id) {
        if !existing.handle.is_finished() {
            warn!(
                task = %task_id,
                "start for task that already owns a live child; ignoring"
            );
            return;
        }
    }

    let (kill_tx, kill_rx) = oneshot::channel::<()>();
    let rt_tx = runtime_tx.clone();
    let opts = options.clone();
    let spawn_id = task_id.clone();

    let handle = tokio::spawn(async move {
        run_child(spec, opts, rt_tx, kill_rx).await;
        debug!(task = %spawn_id, "child runner future finished");
    });

    active.insert(
        task_id,
        ActiveChild {
            kill: Some(kill_tx),
            handle,
        },
    );
}

/// Request that a child be stopped. No-op for unknown or finished tasks.
fn handle_stop(task: &str, active: &mut HashMap<TaskId, ActiveChild>) {
    match active.get_mut(task) {
        Some(child) => {
            if let Some(kill) = child.kill.take() {
                if kill.send(()).is_err() {
                    debug!(task = %task, "child already finished while stopping");
                }
            } else {
                debug!(task = %task, "stop already requested for this child");
            }
        }
        None => {
            debug!(task = %task, "stop for task with no child handle; nothing to do");
        }
    }
}

/// Terminate every live child and wait until all runners have finished.
///
/// After this returns there are zero live child handles, which is what lets
/// a shutdown guarantee that no child outlives the executor.
async fn handle_stop_all(active: &mut HashMap<TaskId, ActiveChild>) {
    if active.is_empty() {
        return;
    }

    info!(count = active.len(), "stopping all supervised children");

    let mut handles = Vec::with_capacity(active.len());
    for (task, mut child) in active.drain() {
        if let Some(kill) = child.kill.take() {
            if kill.send(()).is_err() {
                debug!(task = %task, "child already finished during shutdown");
            }
        }
        handles.push(child.handle);
    }

    for handle in handles {
        let _ = handle.await;
    }
}
