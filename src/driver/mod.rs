// src/driver/mod.rs

//! Driver channel: the sole boundary between this executor and the remote
//! driver.
//!
//! - [`wire`] declares the JSON message shapes for both directions.
//! - [`channel`] connects to the driver and turns inbound lines into
//!   runtime events.
//! - [`sink`] provides the `StatusSink` trait and the concrete
//!   `DriverStatusSink` used in production; tests can substitute a sink
//!   that records updates in memory.

pub mod channel;
pub mod sink;
pub mod wire;

pub use channel::connect;
pub use sink::{DriverStatusSink, StatusSink};
pub use wire::{DriverCommand, ExecutorMessage, InitParams};
