// src/driver/channel.rs

//! Inbound side of the driver connection.

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::driver::sink::DriverStatusSink;
use crate::driver::wire::decode_command;
use crate::errors::{Result, TaskexecError};
use crate::runtime::RuntimeEvent;

/// Connect to the driver and start the inbound reader.
///
/// The reader runs on its own task and turns each JSON line into a
/// [`RuntimeEvent::CommandReceived`]. Malformed lines are logged and
/// skipped; the executor never crashes on driver input. When the driver
/// closes the connection (EOF or read error), a shutdown is requested so
/// that no child process can outlive an executor nobody is driving.
///
/// Returns the outbound [`DriverStatusSink`] for the same connection.
pub async fn connect(
    addr: &str,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
) -> Result<DriverStatusSink> {
    let stream = TcpStream::connect(addr)
        .await
        .map_err(|e| TaskexecError::Channel(format!("connect to driver {addr}: {e}")))?;

    info!(driver = %addr, "connected to driver");

    let (read_half, write_half) = stream.into_split();

    tokio::spawn(async move {
        let reader = BufReader::new(read_half);
        let mut lines = reader.lines();

        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    match decode_command(line) {
                        Ok(command) => {
                            debug!(?command, "driver command received");
                            if runtime_tx
                                .send(RuntimeEvent::CommandReceived(command))
                                .await
                                .is_err()
                            {
                                debug!("runtime gone; stopping driver reader");
                                return;
                            }
                        }
                        Err(e) => {
                            warn!(error = %e, "ignoring malformed driver line");
                        }
                    }
                }
                Ok(None) => {
                    info!("driver closed the connection; requesting shutdown");
                    let _ = runtime_tx.send(RuntimeEvent::ShutdownRequested).await;
                    return;
                }
                Err(e) => {
                    warn!(error = %e, "driver connection read error; requesting shutdown");
                    let _ = runtime_tx.send(RuntimeEvent::ShutdownRequested).await;
                    return;
                }
            }
        }
    });

    Ok(DriverStatusSink::new(write_half))
}
