// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaskexecError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Malformed task payload: {0}")]
    Launch(String),

    #[error("Child did not stop within the grace period: {0}")]
    Termination(String),

    #[error("Driver channel error: {0}")]
    Channel(String),

    #[error("Driver protocol error: {0}")]
    Protocol(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, TaskexecError>;
