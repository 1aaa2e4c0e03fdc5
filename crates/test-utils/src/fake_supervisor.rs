use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use taskexec::errors::Result;
use taskexec::runtime::{ChildOutcome, RuntimeEvent, TaskId};
use taskexec::supervise::SupervisorBackend;
use taskexec::task::TaskSpec;

/// What the fake should pretend happened when a task is started.
#[derive(Debug, Clone)]
pub enum FakeOutcome {
    /// Report a started child that immediately exits with this code.
    Exit(i32),
    /// Report that the child could not be created.
    SpawnFail(String),
    /// Report a started child that never exits until it is stopped.
    Hang,
}

/// A fake supervisor that:
/// - records which tasks were started and stopped
/// - emits scripted child lifecycle events instead of spawning processes.
pub struct FakeSupervisor {
    runtime_tx: mpsc::Sender<RuntimeEvent>,
    started: Arc<Mutex<Vec<TaskId>>>,
    stopped: Arc<Mutex<Vec<TaskId>>>,
    outcomes: HashMap<TaskId, FakeOutcome>,
    default_outcome: FakeOutcome,
    hanging: HashSet<TaskId>,
}

impl FakeSupervisor {
    pub fn new(
        runtime_tx: mpsc::Sender<RuntimeEvent>,
        started: Arc<Mutex<Vec<TaskId>>>,
        stopped: Arc<Mutex<Vec<TaskId>>>,
    ) -> Self {
        Self {
            runtime_tx,
            started,
            stopped,
            outcomes: HashMap::new(),
            default_outcome: FakeOutcome::Exit(0),
            hanging: HashSet::new(),
        }
    }

    /// Script the outcome for one task identifier.
    pub fn with_outcome(mut self, task: &str, outcome: FakeOutcome) -> Self {
        self.outcomes.insert(task.to_string(), outcome);
        self
    }

    /// Script the outcome used for tasks without a per-task entry
    /// (default: exit 0).
    pub fn with_default_outcome(mut self, outcome: FakeOutcome) -> Self {
        self.default_outcome = outcome;
        self
    }

    fn outcome_for(&self, task: &str) -> FakeOutcome {
        self.outcomes
            .get(task)
            .cloned()
            .unwrap_or_else(|| self.default_outcome.clone())
    }
}

impl SupervisorBackend for FakeSupervisor {
    fn start_task(
        &mut self,
        spec: TaskSpec,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let outcome = self.outcome_for(&spec.task_id);
        let tx = self.runtime_tx.clone();
        let started = Arc::clone(&self.started);

        if matches!(outcome, FakeOutcome::Hang) {
            self.hanging.insert(spec.task_id.clone());
        }

        Box::pin(async move {
            started.lock().unwrap().push(spec.task_id.clone());

            match outcome {
                FakeOutcome::Exit(code) => {
                    tx.send(RuntimeEvent::ChildStarted {
                        task: spec.task_id.clone(),
                    })
                    .await
                    .map_err(anyhow::Error::from)?;
                    tx.send(RuntimeEvent::ChildExited {
                        task: spec.task_id,
                        outcome: ChildOutcome::Exited(code),
                    })
                    .await
                    .map_err(anyhow::Error::from)?;
                }
                FakeOutcome::SpawnFail(error) => {
                    tx.send(RuntimeEvent::ChildSpawnFailed {
                        task: spec.task_id,
                        error,
                    })
                    .await
                    .map_err(anyhow::Error::from)?;
                }
                FakeOutcome::Hang => {
                    tx.send(RuntimeEvent::ChildStarted {
                        task: spec.task_id,
                    })
                    .await
                    .map_err(anyhow::Error::from)?;
                }
            }
            Ok(())
        })
    }

    fn stop_task(
        &mut self,
        task: TaskId,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let was_hanging = self.hanging.remove(&task);
        let tx = self.runtime_tx.clone();
        let stopped = Arc::clone(&self.stopped);

        Box::pin(async move {
            stopped.lock().unwrap().push(task.clone());

            if was_hanging {
                tx.send(RuntimeEvent::ChildExited {
                    task,
                    outcome: ChildOutcome::Killed,
                })
                .await
                .map_err(anyhow::Error::from)?;
            }
            Ok(())
        })
    }

    fn stop_all(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        // "Terminate" every hanging child. No events: stop_all is only used
        // on shutdown, after the core has already marked live tasks KILLED.
        self.hanging.clear();
        Box::pin(async move { Ok(()) })
    }
}
