// src/driver/sink.rs

//! Outbound status-update delivery.
//!
//! The runtime talks to a `StatusSink` instead of a raw socket. This makes
//! it easy to record updates in-memory in tests while keeping the production
//! implementation (framed JSON over the driver connection) in
//! [`DriverStatusSink`].

use std::future::Future;
use std::pin::Pin;

use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::net::tcp::OwnedWriteHalf;

use crate::driver::wire::{ExecutorMessage, encode_message};
use crate::errors::{Result, TaskexecError};
use crate::task::state::StatusUpdate;

/// Trait abstracting how status updates reach the driver.
///
/// Production code uses [`DriverStatusSink`]; tests can provide their own
/// implementation that records updates instead of writing to a socket.
pub trait StatusSink: Send {
    /// Deliver one status update, best-effort.
    ///
    /// Implementations report failures through the returned `Result`; the
    /// caller decides that failures are logged rather than escalated.
    fn send_update(
        &mut self,
        update: StatusUpdate,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Production sink writing newline-delimited JSON to the driver connection.
///
/// Owned exclusively by the runtime shell; every update is flushed
/// immediately so a shutdown never leaves terminal updates buffered.
pub struct DriverStatusSink {
    writer: BufWriter<OwnedWriteHalf>,
}

impl DriverStatusSink {
    pub fn new(write_half: OwnedWriteHalf) -> Self {
        Self {
            writer: BufWriter::new(write_half),
        }
    }
}

impl StatusSink for DriverStatusSink {
    fn send_update(
        &mut self,
        update: StatusUpdate,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            let line = encode_message(&ExecutorMessage::StatusUpdate(update))?;

            self.writer
                .write_all(line.as_bytes())
                .await
                .map_err(|e| TaskexecError::Channel(format!("write failed: {e}")))?;
            self.writer
                .write_all(b"\n")
                .await
                .map_err(|e| TaskexecError::Channel(format!("write failed: {e}")))?;
            self.writer
                .flush()
                .await
                .map_err(|e| TaskexecError::Channel(format!("flush failed: {e}")))?;

            Ok(())
        })
    }
}
