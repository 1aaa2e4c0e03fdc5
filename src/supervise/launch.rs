// src/supervise/launch.rs

//! Translating a task's argument payload into a child-process invocation.

use std::path::PathBuf;
use std::time::Duration;

use tokio::process::Command;

use crate::errors::{Result, TaskexecError};
use crate::task::state::TaskSpec;
use crate::types::LaunchMode;

/// Delimiter between payload elements on the wire.
pub const PAYLOAD_DELIMITER: char = '\t';

/// Options for turning payloads into child processes, from `[launch]`.
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub mode: LaunchMode,
    pub java_bin: String,
    pub working_dir: Option<PathBuf>,
    /// Time between the graceful stop signal and forceful kill.
    pub grace_period: Duration,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            mode: LaunchMode::default(),
            java_bin: "java".to_string(),
            working_dir: None,
            grace_period: Duration::from_millis(5000),
        }
    }
}

/// Split a payload into its ordered elements.
///
/// Elements are opaque: empty components in the middle are preserved as-is.
/// Only a fully empty payload yields no elements.
pub fn split_payload(payload: &str) -> Vec<String> {
    if payload.is_empty() {
        return Vec::new();
    }
    payload
        .split(PAYLOAD_DELIMITER)
        .map(str::to_string)
        .collect()
}

/// Build the child-process command for a task.
///
/// - `jvm` mode interprets the payload as `[classpath, main-class, args...]`
///   and produces `<java_bin> -cp <classpath> <main-class> <args...>`.
/// - `raw` mode interprets the payload as `[program, args...]`.
///
/// Fails with [`TaskexecError::Launch`] when the payload has too few
/// elements for the mode; semantic correctness of the elements is not
/// checked here.
pub fn build_command(spec: &TaskSpec, options: &LaunchOptions) -> Result<Command> {
    let elements = split_payload(&spec.payload);

    if elements.is_empty() {
        return Err(TaskexecError::Launch(format!(
            "task '{}' has an empty argument payload",
            spec.task_id
        )));
    }

    let mut cmd = match options.mode {
        LaunchMode::Jvm => {
            if elements.len() < 2 {
                return Err(TaskexecError::Launch(format!(
                    "task '{}': jvm payload needs [classpath, main-class, args...], got {} element(s)",
                    spec.task_id,
                    elements.len()
                )));
            }
            let mut c = Command::new(&options.java_bin);
            c.arg("-cp").arg(&elements[0]).arg(&elements[1]);
            c.args(&elements[2..]);
            c
        }
        LaunchMode::Raw => {
            let mut c = Command::new(&elements[0]);
            c.args(&elements[1..]);
            c
        }
    };

    if let Some(dir) = &options.working_dir {
        cmd.current_dir(dir);
    }

    Ok(cmd)
}
