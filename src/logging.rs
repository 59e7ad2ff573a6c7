// src/logging.rs

//! Logging setup for `ecsrun` using `tracing` + `tracing-subscriber`.
//!
//! The filter is chosen in this order:
//! 1. `--log-level` CLI flag
//! 2. `ECSRUN_LOG`: either a bare level ("debug") or a full filter
//!    directive ("ecsrun=trace,aws_smithy_runtime=debug")
//! 3. `info`
//!
//! A bare level applies to `ecsrun` only; the SDK and HTTP stack stay at
//! `warn`. Logs are sent to STDERR so that stdout only carries the
//! `key=value` outputs.

use anyhow::{Context, Result};
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::LogLevel;

pub const LOG_ENV_VAR: &str = "ECSRUN_LOG";

/// Initialise global logging subscriber.
///
/// Safe to call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env = std::env::var(LOG_ENV_VAR).ok();
    let filter = build_filter(cli_level, env.as_deref())?;

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))?;

    Ok(())
}

/// Build the subscriber filter from the CLI level and the `ECSRUN_LOG` value.
pub fn build_filter(cli_level: Option<LogLevel>, env: Option<&str>) -> Result<EnvFilter> {
    if let Some(lvl) = cli_level {
        return Ok(scoped_filter(level_from_log_level(lvl)));
    }

    match env.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(scoped_filter(Level::INFO)),
        Some(s) => match parse_level_str(s) {
            Some(level) => Ok(scoped_filter(level)),
            None => EnvFilter::try_new(s)
                .with_context(|| format!("invalid {LOG_ENV_VAR} filter '{s}'")),
        },
    }
}

fn scoped_filter(level: Level) -> EnvFilter {
    let level = level.to_string().to_lowercase();
    EnvFilter::new(format!("warn,ecsrun={level}"))
}

fn level_from_log_level(lvl: LogLevel) -> Level {
    match lvl {
        LogLevel::Error => Level::ERROR,
        LogLevel::Warn => Level::WARN,
        LogLevel::Info => Level::INFO,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Trace => Level::TRACE,
    }
}

fn parse_level_str(s: &str) -> Option<Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(Level::ERROR),
        "warn" | "warning" => Some(Level::WARN),
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => None,
    }
}
