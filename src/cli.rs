// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `taskexec`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "taskexec",
    version,
    about = "Executor runtime that runs driver-assigned tasks as supervised child processes.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Taskexec.toml` in the current working directory. A missing
    /// file at the default path is not an error; built-in defaults apply.
    #[arg(long, value_name = "PATH", default_value = "Taskexec.toml")]
    pub config: String,

    /// Driver endpoint to connect to, as `host:port`.
    ///
    /// Overrides the `TASKEXEC_DRIVER` environment variable and the
    /// `[driver].address` config value.
    #[arg(long, value_name = "ADDR")]
    pub driver: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TASKEXEC_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
