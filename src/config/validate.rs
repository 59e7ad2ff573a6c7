// src/config/validate.rs

use crate::config::duration::parse_duration;
use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{EcsrunError, Result};
use crate::model::RESERVED_LABEL;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::EcsrunError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw))
    }
}

/// File-level checks. Checks that need the merged CLI values (required
/// fields, override pairing) happen when the invocation is built.
pub fn validate_config(cfg: &RawConfigFile) -> Result<()> {
    validate_slot_label(cfg)?;
    validate_wait(cfg)?;
    validate_console(cfg)?;
    Ok(())
}

fn validate_slot_label(cfg: &RawConfigFile) -> Result<()> {
    if let Some(label) = &cfg.invocation.slot_label {
        if label.trim().eq_ignore_ascii_case(RESERVED_LABEL) {
            return Err(EcsrunError::Config(format!(
                "[invocation].slot_label must not be '{RESERVED_LABEL}'"
            )));
        }
    }
    Ok(())
}

fn validate_wait(cfg: &RawConfigFile) -> Result<()> {
    let parse = |key: &str, value: &Option<String>| -> Result<Option<std::time::Duration>> {
        value
            .as_deref()
            .map(|s| parse_duration(s).map_err(|e| EcsrunError::Config(format!("[wait].{key}: {e}"))))
            .transpose()
    };

    let max_wait = parse("max_wait", &cfg.wait.max_wait)?;
    let poll_interval = parse("poll_interval", &cfg.wait.poll_interval)?;

    if let (Some(max), Some(poll)) = (max_wait, poll_interval) {
        if poll > max {
            return Err(EcsrunError::Config(format!(
                "[wait].poll_interval ({poll:?}) must not exceed [wait].max_wait ({max:?})"
            )));
        }
    }
    Ok(())
}

fn validate_console(cfg: &RawConfigFile) -> Result<()> {
    if let Some(template) = &cfg.console.url_template {
        if !template.contains("{task}") {
            return Err(EcsrunError::Config(
                "[console].url_template must contain a {task} placeholder".to_string(),
            ));
        }
    }
    Ok(())
}
