// src/task/mod.rs

//! Task lifecycle tracking.
//!
//! - [`state`] declares the task states, the status-update record, and the
//!   task description received from the driver.
//! - [`registry`] owns one lifecycle entry per task identifier and is the
//!   only place state transitions happen.

pub mod registry;
pub mod state;

pub use registry::{LaunchRejection, TaskRegistry};
pub use state::{StatusUpdate, TaskSpec, TaskState};
