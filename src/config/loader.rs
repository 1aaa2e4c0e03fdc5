// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw
/// `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_or_default`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and run validation, falling back to
/// built-in defaults if the file does not exist.
///
/// Executors are typically configured via the `--driver` flag or the
/// `TASKEXEC_DRIVER` environment variable, so the config file is optional:
/// a missing file means "all defaults". A file that exists but fails to
/// parse or validate is still an error.
pub fn load_or_default(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();

    let raw = if path.exists() {
        load_from_path(path)?
    } else {
        debug!(path = %path.display(), "config file not found; using defaults");
        RawConfigFile::default()
    };

    ConfigFile::try_from(raw)
}

/// Helper to resolve a default config path.
///
/// Currently this just returns `Taskexec.toml` in the current working
/// directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Taskexec.toml")
}
