// src/runtime/event_handlers.rs

//! Event handling logic for the core executor.

use tracing::{error, info, warn};

use crate::driver::wire::InitParams;
use crate::runtime::{ChildOutcome, TaskId};
use crate::task::registry::{LaunchRejection, TaskRegistry};
use crate::task::state::{StatusUpdate, TaskSpec, TaskState};

/// Command produced by the pure core, to be executed by the outer IO shell.
#[derive(Debug, Clone)]
pub enum CoreCommand {
    /// Hand this task to the supervisor to spawn its child process.
    StartChild(TaskSpec),
    /// Ask the supervisor to terminate the child owned by this task.
    StopChild(TaskId),
    /// Ask the supervisor to terminate every live child and wait for them.
    StopAllChildren,
    /// Send this status update to the driver.
    SendStatus(StatusUpdate),
    /// Request that the process exits (after a shutdown command).
    RequestExit,
}

/// Decision returned by the core after handling a single `RuntimeEvent`.
#[derive(Debug, Clone)]
pub struct CoreStep {
    /// Commands the IO shell should execute, in order.
    pub commands: Vec<CoreCommand>,
    /// Whether the outer runtime loop should keep running.
    pub keep_running: bool,
}

impl CoreStep {
    fn keep_running(commands: Vec<CoreCommand>) -> Self {
        Self {
            commands,
            keep_running: true,
        }
    }
}

/// Handle the driver's `init` command.
///
/// Purely informational: the executor records that it has been initialised
/// and logs the identifiers the driver handed over.
pub fn handle_init(initialized: &mut bool, params: InitParams) -> CoreStep {
    if *initialized {
        warn!("driver sent init more than once; ignoring");
        return CoreStep::keep_running(Vec::new());
    }

    *initialized = true;
    info!(
        executor_id = params.executor_id.as_deref().unwrap_or("-"),
        framework_id = params.framework_id.as_deref().unwrap_or("-"),
        "executor initialised by driver"
    );

    CoreStep::keep_running(Vec::new())
}

/// Handle a `launch_task` command.
///
/// Accepting the launch and emitting the STAGING update are one step; the
/// supervisor then reports back asynchronously whether the child spawned.
pub fn handle_launch(registry: &mut TaskRegistry, spec: TaskSpec) -> CoreStep {
    match registry.accept_launch(&spec) {
        Ok(staging_update) => {
            info!(task = %spec.task_id, "launching task");
            CoreStep::keep_running(vec![
                CoreCommand::SendStatus(staging_update),
                CoreCommand::StartChild(spec),
            ])
        }
        Err(LaunchRejection::DuplicateLive(state)) => {
            // The existing child handle must not be disturbed.
            warn!(
                task = %spec.task_id,
                state = %state,
                "duplicate launch for live task; rejecting"
            );
            CoreStep::keep_running(Vec::new())
        }
        Err(LaunchRejection::AlreadyTerminal(state)) => {
            warn!(
                task = %spec.task_id,
                state = %state,
                "launch for already-terminal task identifier; rejecting"
            );
            CoreStep::keep_running(Vec::new())
        }
    }
}

/// Handle a `kill_task` command.
///
/// - Live task: forward a stop to the supervisor. The KILLED transition is
///   recorded when the runner confirms the child is gone, so the update
///   always reflects a dead process.
/// - Terminal task: logged no-op; the terminal update was already sent and
///   is never duplicated.
/// - Unknown identifier: acknowledged once with an informational LOST
///   update, mirroring the driver-may-retry leniency of the protocol.
pub fn handle_kill(registry: &mut TaskRegistry, task: &str) -> CoreStep {
    match registry.state_of(task) {
        Some(state) if state.is_terminal() => {
            info!(
                task = %task,
                state = %state,
                "kill for task already in terminal state; nothing to do"
            );
            CoreStep::keep_running(Vec::new())
        }
        Some(state) => {
            info!(task = %task, state = %state, "kill requested; stopping child");
            CoreStep::keep_running(vec![CoreCommand::StopChild(task.to_string())])
        }
        None => {
            warn!(task = %task, "kill for unknown task identifier; reporting LOST");
            let update = registry.mark_unknown_lost(task, "unknown task");
            CoreStep::keep_running(vec![CoreCommand::SendStatus(update)])
        }
    }
}

/// Handle the supervisor's confirmation that a child process spawned.
pub fn handle_child_started(registry: &mut TaskRegistry, task: &str) -> CoreStep {
    match registry.mark_running(task) {
        Some(update) => CoreStep::keep_running(vec![CoreCommand::SendStatus(update)]),
        None => {
            // A child must never keep running for a task that is already
            // terminal; tell the supervisor to reap it.
            if registry.state_of(task).is_some_and(TaskState::is_terminal) {
                warn!(task = %task, "child started for terminal task; stopping it");
                CoreStep::keep_running(vec![CoreCommand::StopChild(task.to_string())])
            } else {
                CoreStep::keep_running(Vec::new())
            }
        }
    }
}

/// Handle a spawn failure: the task moves straight to FAILED.
pub fn handle_spawn_failed(
    registry: &mut TaskRegistry,
    task: &str,
    error: String,
) -> CoreStep {
    warn!(task = %task, error = %error, "child process could not be created");

    match registry.mark_terminal(task, TaskState::Failed, Some(error)) {
        Some(update) => CoreStep::keep_running(vec![CoreCommand::SendStatus(update)]),
        None => CoreStep::keep_running(Vec::new()),
    }
}

/// Handle a child exit report from the supervisor.
pub fn handle_child_exited(
    registry: &mut TaskRegistry,
    task: &str,
    outcome: ChildOutcome,
) -> CoreStep {
    let (state, message) = match outcome {
        ChildOutcome::Exited(0) => (TaskState::Finished, None),
        ChildOutcome::Exited(code) => {
            (TaskState::Failed, Some(format!("exited with code {code}")))
        }
        ChildOutcome::Signaled => {
            (TaskState::Failed, Some("terminated by signal".to_string()))
        }
        ChildOutcome::Killed => (TaskState::Killed, None),
        ChildOutcome::Lost(reason) => (TaskState::Lost, Some(reason)),
    };

    match registry.mark_terminal(task, state, message) {
        Some(update) => CoreStep::keep_running(vec![CoreCommand::SendStatus(update)]),
        None => CoreStep::keep_running(Vec::new()),
    }
}

/// Handle the driver's `error` callback: logged, no task-state impact.
pub fn handle_driver_error(code: i32, message: &str) -> CoreStep {
    error!(code, message = %message, "driver reported an error");
    CoreStep::keep_running(Vec::new())
}

/// Handle a shutdown: mark every live task KILLED (one update each), then
/// have the supervisor terminate every child before the loop exits.
pub fn handle_shutdown(registry: &mut TaskRegistry) -> CoreStep {
    let mut commands = Vec::new();

    let live = registry.live_tasks();
    if !live.is_empty() {
        info!(count = live.len(), "shutdown with live tasks; killing children");
    }

    for task in live {
        if let Some(update) = registry.mark_terminal(
            &task,
            TaskState::Killed,
            Some("executor shutting down".to_string()),
        ) {
            commands.push(CoreCommand::SendStatus(update));
        }
    }

    commands.push(CoreCommand::StopAllChildren);
    commands.push(CoreCommand::RequestExit);

    CoreStep {
        commands,
        keep_running: false,
    }
}
