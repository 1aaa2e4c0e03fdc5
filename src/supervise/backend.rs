// src/supervise/backend.rs

//! Pluggable supervisor backend abstraction.
//!
//! The runtime talks to a `SupervisorBackend` instead of a raw mpsc sender.
//! This makes it easy to swap in a fake supervisor in tests while keeping
//! the production implementation in [`supervisor_loop`].
//!
//! - `RealSupervisorBackend` is the default implementation used by
//!   `taskexec`. It wraps the supervisor loop and forwards requests over an
//!   mpsc channel.
//! - Tests can provide their own `SupervisorBackend` that, for example,
//!   records which tasks were started and directly emits child lifecycle
//!   events without spawning real processes.

use std::future::Future;
use std::pin::Pin;

use tokio::sync::{mpsc, oneshot};

use crate::errors::{Result, TaskexecError};
use crate::runtime::{RuntimeEvent, TaskId};
use crate::supervise::launch::LaunchOptions;
use crate::supervise::supervisor_loop::{SupervisorRequest, spawn_supervisor};
use crate::task::state::TaskSpec;

/// Trait abstracting how child processes are started and stopped.
///
/// Production code uses [`RealSupervisorBackend`]; tests can provide their
/// own implementation that doesn't spawn real processes.
pub trait SupervisorBackend: Send {
    /// Begin supervising the child process for this task.
    fn start_task(
        &mut self,
        spec: TaskSpec,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;

    /// Terminate the child owned by this task identifier (idempotent).
    fn stop_task(
        &mut self,
        task: TaskId,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;

    /// Terminate every live child; resolves once none remain.
    fn stop_all(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Real supervisor backend used in production.
///
/// Internally, this just wraps the supervisor loop in [`spawn_supervisor`].
pub struct RealSupervisorBackend {
    tx: mpsc::Sender<SupervisorRequest>,
}

impl RealSupervisorBackend {
    /// Create a new real supervisor backend, wiring it to the given runtime
    /// event sender.
    ///
    /// This spawns the background supervisor loop immediately.
    pub fn new(runtime_tx: mpsc::Sender<RuntimeEvent>, options: LaunchOptions) -> Self {
        let tx = spawn_supervisor(runtime_tx, options);
        Self { tx }
    }

    fn channel_gone() -> TaskexecError {
        TaskexecError::Channel("supervisor loop is gone".to_string())
    }
}

impl SupervisorBackend for RealSupervisorBackend {
    fn start_task(
        &mut self,
        spec: TaskSpec,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let tx = self.tx.clone();
        Box::pin(async move {
            tx.send(SupervisorRequest::Start(spec))
                .await
                .map_err(|_| Self::channel_gone())
        })
    }

    fn stop_task(
        &mut self,
        task: TaskId,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let tx = self.tx.clone();
        Box::pin(async move {
            tx.send(SupervisorRequest::Stop(task))
                .await
                .map_err(|_| Self::channel_gone())
        })
    }

    fn stop_all(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let tx = self.tx.clone();
        Box::pin(async move {
            let (ack_tx, ack_rx) = oneshot::channel();
            tx.send(SupervisorRequest::StopAll(ack_tx))
                .await
                .map_err(|_| Self::channel_gone())?;
            ack_rx.await.map_err(|_| Self::channel_gone())
        })
    }
}
