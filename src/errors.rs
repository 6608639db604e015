// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HotrunError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Watch error: {0}")]
    WatchError(String),

    #[error("Build error:\n{output}")]
    BuildError { output: String },

    #[error("Pack error: {0}")]
    PackError(String),

    #[error("Launch error: {0}")]
    LaunchError(String),

    #[error("Termination error: {0}")]
    TerminationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<notify::Error> for HotrunError {
    fn from(err: notify::Error) -> Self {
        HotrunError::WatchError(err.to_string())
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, HotrunError>;
