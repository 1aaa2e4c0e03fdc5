// tests/driver_channel.rs

//! End-to-end tests over a real TCP pair: a scripted driver on one side,
//! the full runtime (driver channel + core + real supervisor) on the other.

#![cfg(unix)]

mod common;
use crate::common::init_tracing;

use std::error::Error;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::time::timeout;

use taskexec::driver;
use taskexec::driver::wire::ExecutorMessage;
use taskexec::runtime::{CoreExecutor, Runtime, RuntimeEvent};
use taskexec::supervise::RealSupervisorBackend;
use taskexec::task::{StatusUpdate, TaskState};
use taskexec::types::LaunchMode;
use taskexec_test_utils::builders::LaunchOptionsBuilder;

type TestResult = Result<(), Box<dyn Error>>;

/// Accept one executor connection and return the driver-side stream.
async fn driver_listener() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr").to_string();
    (listener, addr)
}

/// Start the full runtime connected to `addr`.
async fn start_executor(addr: &str) -> tokio::task::JoinHandle<taskexec::errors::Result<()>> {
    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(16);

    let options = LaunchOptionsBuilder::new()
        .mode(LaunchMode::Raw)
        .grace_period(Duration::from_millis(500))
        .build();
    let supervisor = RealSupervisorBackend::new(rt_tx.clone(), options);

    let sink = driver::connect(addr, rt_tx.clone())
        .await
        .expect("connect to scripted driver");

    let runtime = Runtime::new(CoreExecutor::new(), rt_rx, supervisor, sink);
    tokio::spawn(runtime.run())
}

async fn send_line(stream: &mut TcpStream, line: &str) -> TestResult {
    stream.write_all(line.as_bytes()).await?;
    stream.write_all(b"\n").await?;
    stream.flush().await?;
    Ok(())
}

async fn read_update(
    lines: &mut tokio::io::Lines<BufReader<tokio::net::tcp::OwnedReadHalf>>,
) -> StatusUpdate {
    let line = timeout(Duration::from_secs(3), lines.next_line())
        .await
        .expect("timed out waiting for a status update")
        .expect("read error")
        .expect("executor closed the connection early");

    match serde_json::from_str::<ExecutorMessage>(&line).expect("decode executor message") {
        ExecutorMessage::StatusUpdate(update) => update,
    }
}

#[tokio::test]
async fn launch_over_the_wire_reports_staging_running_finished() -> TestResult {
    init_tracing();

    let (listener, addr) = driver_listener().await;

    let executor = start_executor(&addr).await;
    let (stream, _) = listener.accept().await?;
    let (read_half, mut write_half) = stream.into_split();
    let mut lines = BufReader::new(read_half).lines();

    write_half
        .write_all(
            concat!(
                "{\"type\":\"init\",\"executor_id\":\"e-1\",\"framework_id\":\"f-1\"}\n",
                "{\"type\":\"launch_task\",\"task_id\":\"e2e\",\"payload\":\"/bin/sh\\t-c\\texit 0\"}\n",
            )
            .as_bytes(),
        )
        .await?;
    write_half.flush().await?;

    let staging = read_update(&mut lines).await;
    assert_eq!(staging.task_id, "e2e");
    assert_eq!(staging.state, TaskState::Staging);

    let running = read_update(&mut lines).await;
    assert_eq!(running.state, TaskState::Running);

    let finished = read_update(&mut lines).await;
    assert_eq!(finished.state, TaskState::Finished);

    write_half.write_all(b"{\"type\":\"shutdown\"}\n").await?;
    write_half.flush().await?;

    timeout(Duration::from_secs(3), executor).await???;
    Ok(())
}

#[tokio::test]
async fn malformed_lines_are_skipped_without_crashing() -> TestResult {
    init_tracing();

    let (listener, addr) = driver_listener().await;

    let executor = start_executor(&addr).await;
    let (stream, _) = listener.accept().await?;
    let (read_half, mut write_half) = stream.into_split();
    let mut lines = BufReader::new(read_half).lines();

    write_half
        .write_all(
            concat!(
                "this is not json\n",
                "{\"type\":\"no_such_command\"}\n",
                "{\"type\":\"launch_task\",\"task_id\":\"after-garbage\",\"payload\":\"/bin/sh\\t-c\\texit 0\"}\n",
            )
            .as_bytes(),
        )
        .await?;
    write_half.flush().await?;

    // The garbage lines are ignored; the valid command still executes.
    let staging = read_update(&mut lines).await;
    assert_eq!(staging.task_id, "after-garbage");
    assert_eq!(staging.state, TaskState::Staging);

    write_half.write_all(b"{\"type\":\"shutdown\"}\n").await?;
    write_half.flush().await?;

    timeout(Duration::from_secs(3), executor).await???;
    Ok(())
}

#[tokio::test]
async fn driver_disconnect_shuts_the_executor_down() -> TestResult {
    init_tracing();

    let (listener, addr) = driver_listener().await;

    let executor = start_executor(&addr).await;
    let (stream, _) = listener.accept().await?;

    // Hang up without sending anything.
    drop(stream);

    // EOF on the driver connection must drain into a clean exit.
    timeout(Duration::from_secs(3), executor).await???;
    Ok(())
}
