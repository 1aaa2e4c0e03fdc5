// tests/wire_format.rs

//! Wire-level shapes of the driver protocol.

mod common;
use crate::common::init_tracing;

use taskexec::driver::wire::{
    DriverCommand, ExecutorMessage, decode_command, encode_message,
};
use taskexec::errors::TaskexecError;
use taskexec::task::{StatusUpdate, TaskState};

#[test]
fn decodes_the_driver_command_set() {
    init_tracing();

    let cmd = decode_command(
        r#"{"type":"launch_task","task_id":"f1-1","payload":"/lib/a.jar\tcom.x.Main\targ1"}"#,
    )
    .expect("launch_task");
    match cmd {
        DriverCommand::LaunchTask(spec) => {
            assert_eq!(spec.task_id, "f1-1");
            assert_eq!(spec.payload, "/lib/a.jar\tcom.x.Main\targ1");
        }
        other => panic!("unexpected command: {other:?}"),
    }

    let cmd = decode_command(r#"{"type":"kill_task","task_id":"f1-1"}"#).expect("kill_task");
    assert_eq!(
        cmd,
        DriverCommand::KillTask {
            task_id: "f1-1".to_string()
        }
    );

    assert_eq!(
        decode_command(r#"{"type":"shutdown"}"#).expect("shutdown"),
        DriverCommand::Shutdown
    );

    let cmd = decode_command(r#"{"type":"init","framework_id":"f-9"}"#).expect("init");
    match cmd {
        DriverCommand::Init(params) => {
            assert_eq!(params.framework_id.as_deref(), Some("f-9"));
            assert_eq!(params.executor_id, None);
        }
        other => panic!("unexpected command: {other:?}"),
    }

    let cmd = decode_command(r#"{"type":"error","code":7,"message":"offer rescinded"}"#)
        .expect("error");
    assert_eq!(
        cmd,
        DriverCommand::Error {
            code: 7,
            message: "offer rescinded".to_string()
        }
    );
}

#[test]
fn malformed_input_is_a_protocol_error() {
    init_tracing();

    for line in ["", "not json", r#"{"type":"resource_offer"}"#, r#"{"task_id":"x"}"#] {
        match decode_command(line) {
            Err(TaskexecError::Protocol(_)) => {}
            other => panic!("expected Protocol error for {line:?}, got {other:?}"),
        }
    }
}

#[test]
fn status_updates_encode_with_screaming_states() {
    init_tracing();

    let update = StatusUpdate::new("f1-1", TaskState::Finished);
    let line = encode_message(&ExecutorMessage::StatusUpdate(update)).expect("encode");
    assert_eq!(
        line,
        r#"{"type":"status_update","task_id":"f1-1","state":"FINISHED"}"#
    );

    let update = StatusUpdate::new("f1-2", TaskState::Failed).with_message("exited with code 1");
    let line = encode_message(&ExecutorMessage::StatusUpdate(update)).expect("encode");
    assert_eq!(
        line,
        r#"{"type":"status_update","task_id":"f1-2","state":"FAILED","message":"exited with code 1"}"#
    );
}
