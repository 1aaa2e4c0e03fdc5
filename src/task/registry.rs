// src/task/registry.rs

//! Per-task lifecycle state, keyed by task identifier.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::runtime::TaskId;
use crate::task::state::{StatusUpdate, TaskSpec, TaskState};

/// Why a launch command was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchRejection {
    /// The identifier already owns a live (STAGING or RUNNING) entry.
    DuplicateLive(TaskState),
    /// The identifier already reached a terminal state; identifiers are
    /// never reused.
    AlreadyTerminal(TaskState),
}

#[derive(Debug, Clone)]
struct TaskEntry {
    id: TaskId,
    state: TaskState,
}

/// Tracks the lifecycle of every task this executor has seen.
///
/// The registry is the single place transitions happen, and every transition
/// returns its [`StatusUpdate`] from the same call: there is no transition
/// without an update and no update without a transition. Calls that would
/// move a task out of a terminal state return `None` and log instead.
///
/// Pure state: no channels, no tokio types, no IO.
#[derive(Debug, Default)]
pub struct TaskRegistry {
    tasks: HashMap<TaskId, TaskEntry>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept a launch command, creating a STAGING entry for the identifier.
    ///
    /// A second launch for an identifier that is still live, or one that has
    /// already terminated, is rejected without touching the existing entry.
    pub fn accept_launch(
        &mut self,
        spec: &TaskSpec,
    ) -> Result<StatusUpdate, LaunchRejection> {
        if let Some(existing) = self.tasks.get(&spec.task_id) {
            if existing.state.is_terminal() {
                return Err(LaunchRejection::AlreadyTerminal(existing.state));
            }
            return Err(LaunchRejection::DuplicateLive(existing.state));
        }

        self.tasks.insert(
            spec.task_id.clone(),
            TaskEntry {
                id: spec.task_id.clone(),
                state: TaskState::Staging,
            },
        );

        debug!(task = %spec.task_id, "task accepted; entering STAGING");
        Ok(StatusUpdate::new(spec.task_id.clone(), TaskState::Staging))
    }

    /// Transition a STAGING task to RUNNING.
    ///
    /// Returns `None` (and logs) if the task is unknown or not in STAGING.
    pub fn mark_running(&mut self, task: &str) -> Option<StatusUpdate> {
        let entry = match self.tasks.get_mut(task) {
            Some(e) => e,
            None => {
                warn!(task = %task, "RUNNING transition for unknown task; ignoring");
                return None;
            }
        };

        match entry.state {
            TaskState::Staging => {
                entry.state = TaskState::Running;
                debug!(task = %entry.id, "task transitioned STAGING -> RUNNING");
                Some(StatusUpdate::new(entry.id.clone(), TaskState::Running))
            }
            state => {
                warn!(
                    task = %entry.id,
                    state = %state,
                    "RUNNING transition for task not in STAGING; ignoring"
                );
                None
            }
        }
    }

    /// Transition a live task to a terminal state.
    ///
    /// Returns `None` (and logs) if the task is unknown or already terminal,
    /// which is what guarantees at most one terminal update per identifier.
    pub fn mark_terminal(
        &mut self,
        task: &str,
        state: TaskState,
        message: Option<String>,
    ) -> Option<StatusUpdate> {
        debug_assert!(state.is_terminal());

        let entry = match self.tasks.get_mut(task) {
            Some(e) => e,
            None => {
                warn!(task = %task, state = %state, "terminal transition for unknown task; ignoring");
                return None;
            }
        };

        if entry.state.is_terminal() {
            debug!(
                task = %entry.id,
                current = %entry.state,
                requested = %state,
                "task already terminal; dropping transition"
            );
            return None;
        }

        let previous = entry.state;
        entry.state = state;
        debug!(task = %entry.id, from = %previous, to = %state, "task reached terminal state");

        let mut update = StatusUpdate::new(entry.id.clone(), state);
        update.message = message;
        Some(update)
    }

    /// Record an identifier this executor has never seen as LOST.
    ///
    /// Used to acknowledge a kill for an unknown task: the driver gets one
    /// informational update, and the terminal entry keeps any retried kill
    /// from producing another.
    pub fn mark_unknown_lost(
        &mut self,
        task: &str,
        message: impl Into<String>,
    ) -> StatusUpdate {
        debug_assert!(!self.tasks.contains_key(task));

        self.tasks.insert(
            task.to_string(),
            TaskEntry {
                id: task.to_string(),
                state: TaskState::Lost,
            },
        );

        StatusUpdate::new(task.to_string(), TaskState::Lost).with_message(message)
    }

    /// Current state of an identifier, if it has ever been seen.
    pub fn state_of(&self, task: &str) -> Option<TaskState> {
        self.tasks.get(task).map(|e| e.state)
    }

    /// Identifiers currently in STAGING or RUNNING.
    pub fn live_tasks(&self) -> Vec<TaskId> {
        self.tasks
            .values()
            .filter(|e| !e.state.is_terminal())
            .map(|e| e.id.clone())
            .collect()
    }

    /// `true` if no task is live.
    pub fn is_idle(&self) -> bool {
        self.tasks.values().all(|e| e.state.is_terminal())
    }
}
