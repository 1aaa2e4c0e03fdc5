// src/supervise/child_runner.rs

//! Individual child-process runner.

use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Child;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::runtime::{ChildOutcome, RuntimeEvent};
use crate::supervise::launch::{LaunchOptions, build_command};
use crate::task::state::TaskSpec;

/// Run a single task's child process, reporting lifecycle events back to
/// the runtime.
///
/// - Spawn failure (malformed payload, missing binary, permission denied)
///   is reported as `ChildSpawnFailed`; no child exists afterwards.
/// - A successful spawn is reported as `ChildStarted`, the exit later as
///   `ChildExited`.
/// - If the kill channel fires, the child is stopped gracefully with a
///   bounded grace period before escalating to a forceful kill, and the
///   exit is reported as `ChildExited { outcome: Killed }`.
pub async fn run_child(
    spec: TaskSpec,
    options: LaunchOptions,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
    mut kill_rx: oneshot::Receiver<()>,
) {
    let task_id = spec.task_id.clone();

    let mut cmd = match build_command(&spec, &options) {
        Ok(cmd) => cmd,
        Err(err) => {
            warn!(task = %task_id, error = %err, "refusing to launch task");
            let _ = runtime_tx
                .send(RuntimeEvent::ChildSpawnFailed {
                    task: task_id,
                    error: err.to_string(),
                })
                .await;
            return;
        }
    };

    cmd.stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(err) => {
            warn!(task = %task_id, error = %err, "spawning child process failed");
            let _ = runtime_tx
                .send(RuntimeEvent::ChildSpawnFailed {
                    task: task_id,
                    error: format!("spawn failed: {err}"),
                })
                .await;
            return;
        }
    };

    info!(
        task = %task_id,
        pid = child.id(),
        "child process started"
    );

    drain_output(&task_id, &mut child);

    if runtime_tx
        .send(RuntimeEvent::ChildStarted {
            task: task_id.clone(),
        })
        .await
        .is_err()
    {
        debug!(task = %task_id, "runtime gone before child start was reported");
        return;
    }

    // Either the process exits on its own (normal case), or we receive a
    // stop request from the supervisor (kill command or shutdown).
    let outcome = tokio::select! {
        status_res = child.wait() => match status_res {
            Ok(status) => {
                let outcome = match status.code() {
                    Some(code) => ChildOutcome::Exited(code),
                    None => ChildOutcome::Signaled,
                };
                info!(
                    task = %task_id,
                    exit_code = status.code(),
                    success = status.success(),
                    "child process exited"
                );
                outcome
            }
            Err(e) => {
                warn!(task = %task_id, error = %e, "waiting for child failed");
                ChildOutcome::Lost(format!("wait failed: {e}"))
            }
        },

        kill = &mut kill_rx => {
            match kill {
                Ok(()) => {
                    info!(task = %task_id, "stop requested; terminating child");
                    terminate_child(&task_id, &mut child, options.grace_period).await;
                    ChildOutcome::Killed
                }
                Err(e) => {
                    debug!(
                        task = %task_id,
                        error = %e,
                        "kill channel closed without explicit stop"
                    );
                    // Child will be killed on drop due to kill_on_drop(true).
                    return;
                }
            }
        }
    };

    let _ = runtime_tx
        .send(RuntimeEvent::ChildExited {
            task: task_id,
            outcome,
        })
        .await;
}

/// Drain the child's stdout and stderr into the executor's logs.
///
/// Both streams must always be consumed so the child can never block on a
/// full pipe. Output is never forwarded to the driver.
fn drain_output(task_id: &str, child: &mut Child) {
    if let Some(stdout) = child.stdout.take() {
        let task = task_id.to_string();
        tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                info!(task = %task, "stdout: {}", line);
            }
        });
    }

    if let Some(stderr) = child.stderr.take() {
        let task = task_id.to_string();
        tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                debug!(task = %task, "stderr: {}", line);
            }
        });
    }
}

/// Stop a child gracefully, escalating to a forceful kill after the grace
/// period.
///
/// Only ever signals the exact process this runner spawned. Idempotent: a
/// child that already exited makes every step a no-op.
#[cfg(unix)]
async fn terminate_child(task_id: &str, child: &mut Child, grace: Duration) {
    use nix::sys::signal::{Signal, kill};
    use nix::unistd::Pid;

    use crate::errors::TaskexecError;

    if let Some(pid) = child.id() {
        if let Err(e) = kill(Pid::from_raw(pid as i32), Signal::SIGTERM) {
            debug!(task = %task_id, pid, error = %e, "SIGTERM not delivered");
        }
    }

    match tokio::time::timeout(grace, child.wait()).await {
        Ok(Ok(status)) => {
            debug!(task = %task_id, exit_code = status.code(), "child exited after graceful stop");
        }
        Ok(Err(e)) => {
            warn!(task = %task_id, error = %e, "waiting for child after SIGTERM failed");
        }
        Err(_elapsed) => {
            let err = TaskexecError::Termination(format!(
                "{}ms grace period expired",
                grace.as_millis()
            ));
            warn!(task = %task_id, error = %err, "escalating to forceful kill");
            if let Err(e) = child.kill().await {
                warn!(task = %task_id, error = %e, "forceful kill failed");
            }
        }
    }
}

#[cfg(not(unix))]
async fn terminate_child(task_id: &str, child: &mut Child, _grace: Duration) {
    // No graceful signal on this platform; kill directly.
    if let Err(e) = child.kill().await {
        warn!(task = %task_id, error = %e, "forceful kill failed");
    }
}
