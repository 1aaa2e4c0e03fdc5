// src/runtime/runtime.rs

use std::fmt;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::driver::sink::StatusSink;
use crate::errors::Result;
use crate::supervise::SupervisorBackend;

use super::core::CoreExecutor;
use super::{CoreCommand, RuntimeEvent};

/// Drives the task state machine in response to `RuntimeEvent`s, delegating
/// child-process work to a `SupervisorBackend` and update delivery to a
/// `StatusSink`.
///
/// This is a pure IO shell around `CoreExecutor`, which contains all the
/// lifecycle semantics. This struct handles async IO: reading events from
/// the channel, forwarding start/stop requests, and sending status updates.
pub struct Runtime<S: SupervisorBackend, U: StatusSink> {
    core: CoreExecutor,
    event_rx: mpsc::Receiver<RuntimeEvent>,
    supervisor: S,
    updates: U,
}

impl<S: SupervisorBackend, U: StatusSink> fmt::Debug for Runtime<S, U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .finish_non_exhaustive()
    }
}

impl<S: SupervisorBackend, U: StatusSink> Runtime<S, U> {
    pub fn new(
        core: CoreExecutor,
        event_rx: mpsc::Receiver<RuntimeEvent>,
        supervisor: S,
        updates: U,
    ) -> Self {
        Self {
            core,
            event_rx,
            supervisor,
            updates,
        }
    }

    /// Main event loop.
    ///
    /// - Consumes `RuntimeEvent`s from `event_rx`.
    /// - Feeds them into the core executor.
    /// - Executes the commands returned by the core (start/stop children,
    ///   send status updates, exit).
    pub async fn run(mut self) -> Result<()> {
        info!("taskexec runtime started");

        loop {
            let event = match self.event_rx.recv().await {
                Some(e) => e,
                None => {
                    info!("runtime event channel closed; exiting");
                    break;
                }
            };

            debug!(?event, "runtime received event");

            let step = self.core.step(event);

            for command in step.commands {
                self.execute_command(command).await?;
            }

            if !step.keep_running {
                info!("core requested exit; stopping runtime");
                break;
            }
        }

        info!("runtime exiting");
        Ok(())
    }

    /// Execute a single command from the core.
    async fn execute_command(&mut self, command: CoreCommand) -> Result<()> {
        match command {
            CoreCommand::StartChild(spec) => {
                debug!(task = %spec.task_id, "forwarding launch to supervisor");
                self.supervisor.start_task(spec).await?;
            }
            CoreCommand::StopChild(task) => {
                debug!(task = %task, "forwarding stop to supervisor");
                self.supervisor.stop_task(task).await?;
            }
            CoreCommand::StopAllChildren => {
                self.supervisor.stop_all().await?;
            }
            CoreCommand::SendStatus(update) => {
                // Delivery is best-effort: a failed send is logged and never
                // feeds back into task state.
                if let Err(e) = self.updates.send_update(update.clone()).await {
                    warn!(
                        task = %update.task_id,
                        state = %update.state,
                        error = %e,
                        "failed to send status update to driver"
                    );
                }
            }
            CoreCommand::RequestExit => {
                info!("core issued RequestExit command");
            }
        }
        Ok(())
    }
}
