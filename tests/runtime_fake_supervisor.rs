// tests/runtime_fake_supervisor.rs

//! Runtime-loop behaviour against a scripted supervisor: no real processes,
//! every child lifecycle event is injected by `FakeSupervisor`.

mod common;
use crate::common::{init_tracing, wait_until};

use std::error::Error;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::timeout;

use taskexec::driver::wire::DriverCommand;
use taskexec::runtime::{CoreExecutor, Runtime, RuntimeEvent, TaskId};
use taskexec::task::{StatusUpdate, TaskState};
use taskexec_test_utils::builders::task_spec;
use taskexec_test_utils::fake_supervisor::{FakeOutcome, FakeSupervisor};
use taskexec_test_utils::recording_sink::RecordingSink;

type TestResult = Result<(), Box<dyn Error>>;

type Updates = Arc<Mutex<Vec<StatusUpdate>>>;
type Started = Arc<Mutex<Vec<TaskId>>>;

struct Harness {
    tx: mpsc::Sender<RuntimeEvent>,
    updates: Updates,
    started: Started,
    stopped: Started,
    runtime: JoinHandle<taskexec::errors::Result<()>>,
}

/// Wire a runtime with a fake supervisor and a recording sink.
fn start_harness(configure: impl FnOnce(FakeSupervisor) -> FakeSupervisor) -> Harness {
    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(16);

    let updates: Updates = Arc::new(Mutex::new(Vec::new()));
    let started: Started = Arc::new(Mutex::new(Vec::new()));
    let stopped: Started = Arc::new(Mutex::new(Vec::new()));

    let supervisor = configure(FakeSupervisor::new(
        rt_tx.clone(),
        started.clone(),
        stopped.clone(),
    ));
    let sink = RecordingSink::new(updates.clone());

    let runtime = Runtime::new(CoreExecutor::new(), rt_rx, supervisor, sink);
    let handle = tokio::spawn(runtime.run());

    Harness {
        tx: rt_tx,
        updates,
        started,
        stopped,
        runtime: handle,
    }
}

impl Harness {
    async fn send(&self, command: DriverCommand) {
        self.tx
            .send(RuntimeEvent::CommandReceived(command))
            .await
            .expect("runtime gone");
    }

    fn states_of(&self, task: &str) -> Vec<TaskState> {
        self.updates
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.task_id == task)
            .map(|u| u.state)
            .collect()
    }

    fn terminal_count(&self, task: &str) -> usize {
        self.states_of(task)
            .iter()
            .filter(|s| s.is_terminal())
            .count()
    }

    async fn wait_for_state(&self, task: &str, state: TaskState) {
        let updates = self.updates.clone();
        let task = task.to_string();
        wait_until(
            move || {
                updates
                    .lock()
                    .unwrap()
                    .iter()
                    .any(|u| u.task_id == task && u.state == state)
            },
            "status update",
        )
        .await;
    }

    async fn shutdown(self) -> TestResult {
        self.send(DriverCommand::Shutdown).await;
        timeout(Duration::from_secs(3), self.runtime).await???;
        Ok(())
    }
}

#[tokio::test]
async fn finished_task_emits_exactly_one_terminal_update() -> TestResult {
    init_tracing();

    let h = start_harness(|s| s);

    h.send(DriverCommand::LaunchTask(task_spec(
        "f1-1",
        &["/lib/a.jar", "com.x.Main", "arg1"],
    )))
    .await;
    h.wait_for_state("f1-1", TaskState::Finished).await;

    assert_eq!(
        h.states_of("f1-1"),
        vec![TaskState::Staging, TaskState::Running, TaskState::Finished]
    );
    assert_eq!(h.terminal_count("f1-1"), 1);
    assert_eq!(h.started.lock().unwrap().clone(), vec!["f1-1".to_string()]);

    h.shutdown().await
}

#[tokio::test]
async fn failed_task_leaves_executor_accepting_commands() -> TestResult {
    init_tracing();

    let h = start_harness(|s| s.with_outcome("t-fail", FakeOutcome::Exit(1)));

    h.send(DriverCommand::LaunchTask(task_spec("t-fail", &["cmd"])))
        .await;
    h.wait_for_state("t-fail", TaskState::Failed).await;

    let failed: Vec<StatusUpdate> = h
        .updates
        .lock()
        .unwrap()
        .iter()
        .filter(|u| u.state == TaskState::Failed)
        .cloned()
        .collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].message.as_deref(), Some("exited with code 1"));

    // The executor must keep serving launches after a failure.
    h.send(DriverCommand::LaunchTask(task_spec("t-ok", &["cmd"])))
        .await;
    h.wait_for_state("t-ok", TaskState::Finished).await;

    h.shutdown().await
}

#[tokio::test]
async fn spawn_failure_moves_task_straight_to_failed() -> TestResult {
    init_tracing();

    let h = start_harness(|s| {
        s.with_outcome("bad", FakeOutcome::SpawnFail("binary missing".to_string()))
    });

    h.send(DriverCommand::LaunchTask(task_spec("bad", &["nope"])))
        .await;
    h.wait_for_state("bad", TaskState::Failed).await;

    assert_eq!(
        h.states_of("bad"),
        vec![TaskState::Staging, TaskState::Failed]
    );

    h.shutdown().await
}

#[tokio::test]
async fn duplicate_launch_is_rejected_without_touching_the_child() -> TestResult {
    init_tracing();

    let h = start_harness(|s| s.with_outcome("dup", FakeOutcome::Hang));

    h.send(DriverCommand::LaunchTask(task_spec("dup", &["cmd"])))
        .await;
    h.wait_for_state("dup", TaskState::Running).await;

    h.send(DriverCommand::LaunchTask(task_spec("dup", &["other"])))
        .await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    // One start, no stop, and only the original STAGING update.
    assert_eq!(h.started.lock().unwrap().clone(), vec!["dup".to_string()]);
    assert!(h.stopped.lock().unwrap().is_empty());
    assert_eq!(
        h.states_of("dup"),
        vec![TaskState::Staging, TaskState::Running]
    );

    h.shutdown().await
}

#[tokio::test]
async fn kill_terminates_running_task_with_single_killed_update() -> TestResult {
    init_tracing();

    let h = start_harness(|s| s.with_outcome("k1", FakeOutcome::Hang));

    h.send(DriverCommand::LaunchTask(task_spec("k1", &["cmd"])))
        .await;
    h.wait_for_state("k1", TaskState::Running).await;

    h.send(DriverCommand::KillTask {
        task_id: "k1".to_string(),
    })
    .await;
    h.wait_for_state("k1", TaskState::Killed).await;

    assert_eq!(h.stopped.lock().unwrap().clone(), vec!["k1".to_string()]);
    assert_eq!(h.terminal_count("k1"), 1);

    // A retried kill must not resurrect or duplicate anything.
    h.send(DriverCommand::KillTask {
        task_id: "k1".to_string(),
    })
    .await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(h.terminal_count("k1"), 1);

    h.shutdown().await
}

#[tokio::test]
async fn kill_after_finished_never_duplicates_the_terminal_update() -> TestResult {
    init_tracing();

    let h = start_harness(|s| s);

    h.send(DriverCommand::LaunchTask(task_spec("done", &["cmd"])))
        .await;
    h.wait_for_state("done", TaskState::Finished).await;

    h.send(DriverCommand::KillTask {
        task_id: "done".to_string(),
    })
    .await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(h.terminal_count("done"), 1);
    assert_eq!(
        h.states_of("done"),
        vec![TaskState::Staging, TaskState::Running, TaskState::Finished]
    );

    h.shutdown().await
}

#[tokio::test]
async fn kill_for_unknown_task_reports_lost_exactly_once() -> TestResult {
    init_tracing();

    let h = start_harness(|s| s);

    h.send(DriverCommand::KillTask {
        task_id: "ghost".to_string(),
    })
    .await;
    h.wait_for_state("ghost", TaskState::Lost).await;

    h.send(DriverCommand::KillTask {
        task_id: "ghost".to_string(),
    })
    .await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(h.states_of("ghost"), vec![TaskState::Lost]);
    assert!(h.started.lock().unwrap().is_empty());

    h.shutdown().await
}

#[tokio::test]
async fn shutdown_kills_every_live_task() -> TestResult {
    init_tracing();

    let h = start_harness(|s| {
        s.with_outcome("a", FakeOutcome::Hang)
            .with_outcome("b", FakeOutcome::Hang)
    });

    h.send(DriverCommand::LaunchTask(task_spec("a", &["cmd"])))
        .await;
    h.send(DriverCommand::LaunchTask(task_spec("b", &["cmd"])))
        .await;
    h.wait_for_state("a", TaskState::Running).await;
    h.wait_for_state("b", TaskState::Running).await;

    let updates = h.updates.clone();
    h.shutdown().await?;

    let updates = updates.lock().unwrap();
    for task in ["a", "b"] {
        let states: Vec<TaskState> = updates
            .iter()
            .filter(|u| u.task_id == task)
            .map(|u| u.state)
            .collect();
        assert_eq!(
            states,
            vec![TaskState::Staging, TaskState::Running, TaskState::Killed],
            "task {task}"
        );
    }

    Ok(())
}
