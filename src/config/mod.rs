// src/config/mod.rs

//! `hotrun.toml`: the serde model, lookup next to the watch root, and the
//! semantic checks that turn a `RawConfigFile` into a `ConfigFile`.

pub mod duration;
pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{DEFAULT_CONFIG_FILE, load_and_validate, load_from_path, resolve_config};
pub use model::{ConfigFile, PackSection, RawConfigFile, RunSection};
pub use validate::validate_config;
