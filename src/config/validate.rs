// src/config/validate.rs

use std::str::FromStr;

use anyhow::{Context, Result, anyhow};

use crate::config::model::RawConfigFile;
use crate::types::LaunchMode;

/// Run basic semantic validation against a loaded configuration.
///
/// This checks:
/// - `[launch].mode` is a known mode ("jvm" or "raw")
/// - `[launch].java_bin` is non-empty when the mode is "jvm"
/// - `[launch].grace_period_ms >= 1`
/// - `[driver].address`, if present, is non-empty
///
/// It does **not** resolve the driver address or probe the java binary; both
/// only matter once the executor actually connects or launches.
pub fn validate_config(raw: &RawConfigFile) -> crate::errors::Result<()> {
    run_checks(raw).map_err(|e| crate::errors::TaskexecError::Config(format!("{e:#}")))
}

fn run_checks(raw: &RawConfigFile) -> Result<()> {
    let mode = LaunchMode::from_str(&raw.launch.mode)
        .map_err(|e| anyhow!(e))
        .context("invalid [launch].mode")?;

    if mode == LaunchMode::Jvm && raw.launch.java_bin.trim().is_empty() {
        return Err(anyhow!("[launch].java_bin must not be empty in jvm mode"));
    }

    if raw.launch.grace_period_ms == 0 {
        return Err(anyhow!("[launch].grace_period_ms must be >= 1 (got 0)"));
    }

    if let Some(addr) = &raw.driver.address {
        if addr.trim().is_empty() {
            return Err(anyhow!("[driver].address must not be empty when set"));
        }
    }

    Ok(())
}
