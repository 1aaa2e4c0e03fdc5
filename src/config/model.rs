// src/config/model.rs

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::errors::{Result, TaskexecError};
use crate::supervise::LaunchOptions;
use crate::types::LaunchMode;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [driver]
/// address = "127.0.0.1:5050"
///
/// [launch]
/// mode = "jvm"
/// java_bin = "java"
/// working_dir = "/var/lib/taskexec"
/// grace_period_ms = 5000
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    /// `[driver]` section.
    #[serde(default)]
    pub driver: DriverSection,

    /// `[launch]` section.
    #[serde(default)]
    pub launch: LaunchSection,
}

/// `[driver]` section: where to reach the remote driver.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DriverSection {
    /// Driver endpoint as `host:port`.
    ///
    /// May also be supplied by the `--driver` flag or the `TASKEXEC_DRIVER`
    /// environment variable, which both take precedence.
    #[serde(default)]
    pub address: Option<String>,
}

/// `[launch]` section: how task payloads become child processes.
#[derive(Debug, Clone, Deserialize)]
pub struct LaunchSection {
    /// `"jvm"` or `"raw"`.
    #[serde(default = "default_mode")]
    pub mode: String,

    /// Java binary used in `jvm` mode.
    #[serde(default = "default_java_bin")]
    pub java_bin: String,

    /// Working directory for spawned children; inherited if unset.
    #[serde(default)]
    pub working_dir: Option<String>,

    /// Grace period between the graceful stop signal and forceful kill.
    #[serde(default = "default_grace_period_ms")]
    pub grace_period_ms: u64,
}

fn default_mode() -> String {
    "jvm".to_string()
}

fn default_java_bin() -> String {
    "java".to_string()
}

fn default_grace_period_ms() -> u64 {
    5000
}

impl Default for LaunchSection {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            java_bin: default_java_bin(),
            working_dir: None,
            grace_period_ms: default_grace_period_ms(),
        }
    }
}

/// Validated configuration used by the rest of the executor.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    /// Driver endpoint from `[driver].address`, if configured.
    pub driver_address: Option<String>,

    /// Options for turning payloads into child processes.
    pub launch: LaunchOptions,
}

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = TaskexecError;

    fn try_from(raw: RawConfigFile) -> Result<Self> {
        crate::config::validate::validate_config(&raw)?;

        // `validate_config` already checked the mode string.
        let mode = LaunchMode::from_str(&raw.launch.mode)
            .map_err(TaskexecError::Config)?;

        Ok(ConfigFile {
            driver_address: raw.driver.address,
            launch: LaunchOptions {
                mode,
                java_bin: raw.launch.java_bin,
                working_dir: raw.launch.working_dir.map(PathBuf::from),
                grace_period: Duration::from_millis(raw.launch.grace_period_ms),
            },
        })
    }
}
