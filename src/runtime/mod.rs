// src/runtime/mod.rs

//! Executor runtime loop.
//!
//! This module binds the driver channel, the task state machine, and the
//! process supervisor into a single service loop that reacts to:
//! - driver commands (init / launch / kill / shutdown / error)
//! - child lifecycle reports from the supervisor
//! - shutdown signals
//!
//! The pure core state machine lives in [`core`]; the async/IO shell is
//! implemented in [`runtime`].

use crate::driver::wire::DriverCommand;

/// Canonical task identifier type used throughout the executor.
///
/// Opaque and driver-assigned; unique per framework.
pub type TaskId = String;

/// How a supervised child process ended, as reported by its runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChildOutcome {
    /// The child exited on its own with this exit code.
    Exited(i32),
    /// The child was terminated by a signal this executor did not send.
    Signaled,
    /// The child was terminated in response to a stop request.
    Killed,
    /// The supervisor lost track of the child (e.g. `wait` failed).
    Lost(String),
}

/// Events flowing into the runtime from the driver channel and the
/// supervisor.
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// A command arrived from the driver.
    CommandReceived(DriverCommand),
    /// The supervisor confirmed the child process for this task spawned.
    ChildStarted { task: TaskId },
    /// The supervisor could not create the child process (malformed payload,
    /// missing binary, permission denied).
    ChildSpawnFailed { task: TaskId, error: String },
    /// The child process for this task is gone, one way or another.
    ChildExited { task: TaskId, outcome: ChildOutcome },
    /// Graceful shutdown requested outside the driver protocol
    /// (e.g. Ctrl-C, or the driver connection closing).
    ShutdownRequested,
}

pub mod core;
pub mod event_handlers;
pub mod runtime;

pub use core::CoreExecutor;
pub use event_handlers::{CoreCommand, CoreStep};
pub use runtime::Runtime;
