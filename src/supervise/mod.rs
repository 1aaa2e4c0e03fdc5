// src/supervise/mod.rs

//! Process supervision layer.
//!
//! This module is responsible for actually running the child processes that
//! perform task work, using `tokio::process::Command`, and reporting back to
//! the runtime via `RuntimeEvent`s.
//!
//! - [`launch`] turns a task's argument payload into a concrete invocation.
//! - [`supervisor_loop`] owns the main supervisor loop which manages all
//!   live child handles.
//! - [`child_runner`] handles a single child process: spawn, output
//!   draining, wait, and graceful termination with escalation.
//! - [`backend`] provides the `SupervisorBackend` trait and a concrete
//!   `RealSupervisorBackend` that the runtime uses in production, and which
//!   tests can replace with a fake implementation.

pub mod backend;
pub mod child_runner;
pub mod launch;
pub mod supervisor_loop;

pub use backend::{RealSupervisorBackend, SupervisorBackend};
pub use launch::LaunchOptions;
pub use supervisor_loop::{SupervisorRequest, spawn_supervisor};
