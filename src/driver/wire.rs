// src/driver/wire.rs

//! Wire format for the driver protocol.
//!
//! Both directions use newline-delimited JSON with an internally-tagged
//! envelope, e.g.:
//!
//! ```json
//! {"type":"launch_task","task_id":"f1-1","payload":"/lib/a.jar\tcom.x.Main\targ1"}
//! {"type":"status_update","task_id":"f1-1","state":"FINISHED"}
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{Result, TaskexecError};
use crate::runtime::TaskId;
use crate::task::state::{StatusUpdate, TaskSpec};

/// Commands the driver may send to this executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DriverCommand {
    /// Handshake carrying the identifiers this executor runs under.
    Init(InitParams),
    /// Run this task.
    LaunchTask(TaskSpec),
    /// Stop the task with this identifier.
    KillTask { task_id: TaskId },
    /// Terminate the executor; all live children are stopped first.
    Shutdown,
    /// Driver-side error report; informational.
    Error { code: i32, message: String },
}

/// Parameters of the driver's `init` command. All fields optional: drivers
/// differ in what they pass along.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executor_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework_id: Option<String>,
    /// Opaque executor argument, passed through from the framework.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

/// Messages this executor sends to the driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExecutorMessage {
    StatusUpdate(StatusUpdate),
}

/// Parse one inbound line into a [`DriverCommand`].
pub fn decode_command(line: &str) -> Result<DriverCommand> {
    serde_json::from_str(line)
        .map_err(|e| TaskexecError::Protocol(format!("bad driver command: {e}")))
}

/// Serialize one outbound message (without the trailing newline).
pub fn encode_message(message: &ExecutorMessage) -> Result<String> {
    serde_json::to_string(message)
        .map_err(|e| TaskexecError::Protocol(format!("unencodable message: {e}")))
}
