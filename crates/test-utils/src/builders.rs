#![allow(dead_code)]

use std::path::PathBuf;
use std::time::Duration;

use taskexec::supervise::LaunchOptions;
use taskexec::task::TaskSpec;
use taskexec::types::LaunchMode;

/// Join payload elements with the wire delimiter (tab).
pub fn payload(parts: &[&str]) -> String {
    parts.join("\t")
}

/// Build a `TaskSpec` from a task id and payload elements.
pub fn task_spec(task_id: &str, parts: &[&str]) -> TaskSpec {
    TaskSpec::new(task_id, payload(parts))
}

/// Builder for `LaunchOptions` to simplify test setup.
pub struct LaunchOptionsBuilder {
    options: LaunchOptions,
}

impl LaunchOptionsBuilder {
    pub fn new() -> Self {
        Self {
            options: LaunchOptions::default(),
        }
    }

    pub fn mode(mut self, mode: LaunchMode) -> Self {
        self.options.mode = mode;
        self
    }

    pub fn java_bin(mut self, bin: &str) -> Self {
        self.options.java_bin = bin.to_string();
        self
    }

    pub fn working_dir(mut self, dir: &str) -> Self {
        self.options.working_dir = Some(PathBuf::from(dir));
        self
    }

    pub fn grace_period(mut self, grace: Duration) -> Self {
        self.options.grace_period = grace;
        self
    }

    pub fn build(self) -> LaunchOptions {
        self.options
    }
}

impl Default for LaunchOptionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}
