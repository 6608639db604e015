// src/config/loader.rs

use std::path::{Path, PathBuf};

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{HotrunError, Result};
use crate::fs::FileSystem;

/// Default config file name, looked up in the watch root.
pub const DEFAULT_CONFIG_FILE: &str = "hotrun.toml";

/// Load a configuration file from a given path and return the raw model.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(fs: &dyn FileSystem, path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs
        .read_to_string(path)
        .map_err(|e| HotrunError::ConfigError(format!("{e:#}")))?;

    let config: RawConfigFile = toml::from_str(&contents)?;
    Ok(config)
}

/// Load a configuration file from path and run basic validation.
pub fn load_and_validate(fs: &dyn FileSystem, path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw = load_from_path(fs, path)?;
    ConfigFile::try_from(raw)
}

/// Resolve the effective configuration.
///
/// - An explicit path must exist.
/// - Otherwise `hotrun.toml` in `root` is used if present, and built-in
///   defaults if not.
pub fn resolve_config(
    fs: &dyn FileSystem,
    explicit: Option<&Path>,
    root: &Path,
) -> Result<ConfigFile> {
    match explicit {
        Some(path) => {
            if !fs.exists(path) {
                return Err(HotrunError::ConfigError(format!(
                    "config file {:?} does not exist",
                    path
                )));
            }
            load_and_validate(fs, path)
        }
        None => {
            let path = default_config_path(root);
            if fs.exists(&path) {
                load_and_validate(fs, &path)
            } else {
                Ok(ConfigFile::default())
            }
        }
    }
}

pub fn default_config_path(root: &Path) -> PathBuf {
    root.join(DEFAULT_CONFIG_FILE)
}
