// src/config/validate.rs

use std::time::Duration;

use crate::config::duration::parse_duration;
use crate::config::model::RawConfigFile;
use crate::errors::{HotrunError, Result};

/// Run basic semantic validation against a loaded configuration.
///
/// This checks:
/// - `debounce` parses and is non-zero
/// - `source_extension` is non-empty and has no leading dot
/// - `compiler` and `output_dir` are non-empty
///
/// It does **not** validate `reload_ignore` rules; a rule that fails to
/// compile is logged and disabled when the rules are built.
///
/// Returns the parsed debounce delay.
pub fn validate_config(cfg: &RawConfigFile) -> Result<Duration> {
    let debounce = validate_debounce(&cfg.run.debounce)?;
    validate_run_section(cfg)?;
    Ok(debounce)
}

fn validate_debounce(s: &str) -> Result<Duration> {
    let dur = parse_duration(s)
        .map_err(|e| HotrunError::ConfigError(format!("[run].debounce: {e}")))?;
    if dur.is_zero() {
        return Err(HotrunError::ConfigError(
            "[run].debounce must be greater than zero".to_string(),
        ));
    }
    Ok(dur)
}

fn validate_run_section(cfg: &RawConfigFile) -> Result<()> {
    let ext = cfg.run.source_extension.trim();
    if ext.is_empty() {
        return Err(HotrunError::ConfigError(
            "[run].source_extension must not be empty".to_string(),
        ));
    }
    if ext.starts_with('.') {
        return Err(HotrunError::ConfigError(format!(
            "[run].source_extension should not start with a dot (got {ext:?})"
        )));
    }
    if cfg.run.compiler.trim().is_empty() {
        return Err(HotrunError::ConfigError(
            "[run].compiler must not be empty".to_string(),
        ));
    }
    if cfg.run.output_dir.trim().is_empty() {
        return Err(HotrunError::ConfigError(
            "[run].output_dir must not be empty".to_string(),
        ));
    }
    Ok(())
}
