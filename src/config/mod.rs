// src/config/mod.rs

//! Executor configuration.
//!
//! - [`model`] declares the raw TOML shape and the validated form.
//! - [`loader`] reads and validates a config file.
//! - [`validate`] holds the semantic checks.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_or_default};
pub use model::{ConfigFile, DriverSection, LaunchSection, RawConfigFile};
