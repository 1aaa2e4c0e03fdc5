// src/lib.rs

pub mod cli;
pub mod config;
pub mod driver;
pub mod errors;
pub mod logging;
pub mod runtime;
pub mod supervise;
pub mod task;
pub mod types;

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use tokio::sync::mpsc;
use tracing::info;

use crate::cli::CliArgs;
use crate::config::loader::load_or_default;
use crate::config::model::ConfigFile;
use crate::runtime::{CoreExecutor, Runtime, RuntimeEvent};
use crate::supervise::RealSupervisorBackend;

/// Built-in fallback when neither flag, env var, nor config names a driver.
const DEFAULT_DRIVER_ADDRESS: &str = "127.0.0.1:5050";

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the driver channel (inbound commands, outbound status updates)
/// - the supervisor backend
/// - the core executor + async runtime shell
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_or_default(&config_path)?;

    let driver_addr = resolve_driver_address(&args, &cfg)?;
    info!(driver = %driver_addr, mode = ?cfg.launch.mode, "starting executor");

    // Runtime event channel: single dispatch context for driver commands
    // and child lifecycle reports.
    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(64);

    // Process supervisor (real implementation in production).
    let supervisor = RealSupervisorBackend::new(rt_tx.clone(), cfg.launch.clone());

    // Driver connection: reader task + outbound status sink.
    let sink = driver::channel::connect(&driver_addr, rt_tx.clone()).await?;

    // Ctrl-C → graceful shutdown (children are terminated before exit).
    {
        let tx = rt_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(RuntimeEvent::ShutdownRequested).await;
        });
    }

    // Construct the pure core (single source of truth for task semantics)
    // and the async IO shell around it.
    let core = CoreExecutor::new();
    let runtime = Runtime::new(core, rt_rx, supervisor, sink);
    runtime.run().await?;

    Ok(())
}

/// Resolve the driver endpoint.
///
/// Precedence: `--driver` flag, then `TASKEXEC_DRIVER`, then
/// `[driver].address` from the config file, then the built-in default.
fn resolve_driver_address(args: &CliArgs, cfg: &ConfigFile) -> Result<String> {
    if let Some(addr) = &args.driver {
        return Ok(addr.clone());
    }

    if let Ok(addr) = std::env::var("TASKEXEC_DRIVER") {
        let addr = addr.trim().to_string();
        if addr.is_empty() {
            return Err(anyhow!("TASKEXEC_DRIVER is set but empty"));
        }
        return Ok(addr);
    }

    if let Some(addr) = &cfg.driver_address {
        return Ok(addr.clone());
    }

    Ok(DEFAULT_DRIVER_ADDRESS.to_string())
}
