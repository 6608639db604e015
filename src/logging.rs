// src/logging.rs

//! Logging setup for `hotrun` using `tracing` + `tracing-subscriber`.
//!
//! Filter selection:
//! 1. `--log-level` CLI flag (if provided) applies to every target
//! 2. `HOTRUN_LOG` environment variable, in `EnvFilter` syntax
//!    (e.g. `"debug"` or `"hotrun::engine=debug,info"`)
//! 3. default to `info`
//!
//! Logs go to stderr, timestamped, so stdout stays with the supervised
//! program.

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::LogLevel;

pub const LOG_ENV_VAR: &str = "HOTRUN_LOG";

/// Initialise global logging subscriber.
///
/// Safe to call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let filter = build_filter(cli_level, std::env::var(LOG_ENV_VAR).ok().as_deref())?;

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("{e}"))
        .context("installing tracing subscriber")?;

    Ok(())
}

/// Resolve the filter from the CLI level and the raw env value.
pub fn build_filter(cli_level: Option<LogLevel>, env_value: Option<&str>) -> Result<EnvFilter> {
    if let Some(lvl) = cli_level {
        return Ok(EnvFilter::new(directive_for(lvl)));
    }
    match env_value.map(str::trim).filter(|s| !s.is_empty()) {
        Some(spec) => EnvFilter::try_new(spec)
            .with_context(|| format!("invalid {LOG_ENV_VAR} value {spec:?}")),
        None => Ok(EnvFilter::new("info")),
    }
}

fn directive_for(lvl: LogLevel) -> &'static str {
    match lvl {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}
