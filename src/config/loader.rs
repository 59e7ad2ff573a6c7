// src/config/loader.rs

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Read and deserialize a config file without semantic validation.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a config file and validate it.
///
/// Checks durations, the console link template and the slot label. Fields
/// that may still come from the command line are checked later, when the
/// invocation is assembled.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    debug!(path = %path.as_ref().display(), "loading config file");
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}
