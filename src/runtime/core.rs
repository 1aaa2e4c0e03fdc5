// src/runtime/core.rs

//! Pure core executor state machine.
//!
//! This module contains a synchronous, deterministic "core executor" that
//! consumes [`RuntimeEvent`]s and produces:
//! - an updated task registry
//! - a list of "commands" describing what the IO shell should do next
//!
//! The async/IO-heavy shell (`runtime::runtime::Runtime`) is responsible
//! for:
//! - reading events from channels
//! - forwarding start/stop requests to the supervisor
//! - sending status updates to the driver
//!
//! The core is intended to be extensively tested without any Tokio,
//! channels, sockets, or processes. Because a state transition and its
//! status update come out of the same `step` call, the two are atomic from
//! the rest of the system's perspective.

use crate::driver::wire::DriverCommand;
use crate::runtime::event_handlers::{
    CoreStep, handle_child_exited, handle_child_started, handle_driver_error,
    handle_init, handle_kill, handle_launch, handle_shutdown, handle_spawn_failed,
};
use crate::runtime::RuntimeEvent;
use crate::task::registry::TaskRegistry;
use crate::task::state::TaskState;

/// Pure core executor state.
///
/// Owns the task registry (one state machine entry per task identifier) and
/// nothing else: no channels, no Tokio types, no IO.
#[derive(Debug, Default)]
pub struct CoreExecutor {
    registry: TaskRegistry,
    initialized: bool,
}

impl CoreExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expose a task's state (for tests and diagnostics).
    pub fn state_of(&self, task: &str) -> Option<TaskState> {
        self.registry.state_of(task)
    }

    /// Expose whether any task is live (for tests).
    pub fn is_idle(&self) -> bool {
        self.registry.is_idle()
    }

    /// Handle a single runtime event, updating core state and returning the
    /// resulting commands for the IO shell.
    pub fn step(&mut self, event: RuntimeEvent) -> CoreStep {
        match event {
            RuntimeEvent::CommandReceived(command) => self.step_command(command),
            RuntimeEvent::ChildStarted { task } => {
                handle_child_started(&mut self.registry, &task)
            }
            RuntimeEvent::ChildSpawnFailed { task, error } => {
                handle_spawn_failed(&mut self.registry, &task, error)
            }
            RuntimeEvent::ChildExited { task, outcome } => {
                handle_child_exited(&mut self.registry, &task, outcome)
            }
            RuntimeEvent::ShutdownRequested => handle_shutdown(&mut self.registry),
        }
    }

    fn step_command(&mut self, command: DriverCommand) -> CoreStep {
        match command {
            DriverCommand::Init(params) => handle_init(&mut self.initialized, params),
            DriverCommand::LaunchTask(spec) => handle_launch(&mut self.registry, spec),
            DriverCommand::KillTask { task_id } => {
                handle_kill(&mut self.registry, &task_id)
            }
            DriverCommand::Shutdown => handle_shutdown(&mut self.registry),
            DriverCommand::Error { code, message } => {
                handle_driver_error(code, &message)
            }
        }
    }
}
