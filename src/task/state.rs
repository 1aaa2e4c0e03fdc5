// src/task/state.rs

//! Task states and the status-update record sent to the driver.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::runtime::TaskId;

/// Lifecycle state of a single task.
///
/// Monotonic per task identifier: once a terminal state is reached, no
/// further transition is permitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskState {
    /// Launch command accepted; child process not yet confirmed running.
    Staging,
    /// Child process spawned and being supervised.
    Running,
    /// Child exited with code 0.
    Finished,
    /// Launch failed, or the child exited abnormally.
    Failed,
    /// Child was terminated on an explicit kill command (or shutdown).
    Killed,
    /// The supervisor lost track of the child, or the identifier was never
    /// known to this executor.
    Lost,
}

impl TaskState {
    /// Terminal states are absorbing.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TaskState::Finished | TaskState::Failed | TaskState::Killed | TaskState::Lost
        )
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskState::Staging => "STAGING",
            TaskState::Running => "RUNNING",
            TaskState::Finished => "FINISHED",
            TaskState::Failed => "FAILED",
            TaskState::Killed => "KILLED",
            TaskState::Lost => "LOST",
        };
        f.write_str(s)
    }
}

/// Status report for a single state transition.
///
/// Produced by the [`TaskRegistry`](crate::task::TaskRegistry) in the same
/// call that performs the transition; emitted to the driver at most once per
/// transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub task_id: TaskId,
    pub state: TaskState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StatusUpdate {
    pub fn new(task_id: impl Into<TaskId>, state: TaskState) -> Self {
        Self {
            task_id: task_id.into(),
            state,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Description of a task as assigned by the driver.
///
/// The payload is an ordered, tab-delimited sequence of opaque strings; the
/// executor splits and interprets it positionally but never validates its
/// semantics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSpec {
    pub task_id: TaskId,
    pub payload: String,
}

impl TaskSpec {
    pub fn new(task_id: impl Into<TaskId>, payload: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            payload: payload.into(),
        }
    }
}
