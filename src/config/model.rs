// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::config::validate::validate_config;
use crate::errors::HotrunError;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [run]
/// reload_ignore = ["vendor/", "*.tmp.go"]
/// debounce = "1500ms"
/// source_extension = "go"
/// output_dir = "bin"
/// compiler = "go build"
///
/// [pack]
/// swagger_command = "gf swagger"
/// swagger_dir = "swagger"
/// pack_command = "gf pack swagger packed/data-swagger.go -n packed -y"
/// generated_file = "data-swagger.go"
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub run: RunSection,

    #[serde(default)]
    pub pack: PackSection,
}

/// `[run]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunSection {
    /// Ordered gitignore-style rules. Empty means "watch the whole root
    /// recursively".
    #[serde(default)]
    pub reload_ignore: Vec<String>,

    /// Delay between the first change and the rebuild, e.g. `"1500ms"`.
    #[serde(default = "default_debounce")]
    pub debounce: String,

    /// Extension (without dot) of files that trigger a rebuild.
    #[serde(default = "default_source_extension")]
    pub source_extension: String,

    /// Directory the binary is written to, relative to the watch root.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Compiler program plus leading arguments.
    #[serde(default = "default_compiler")]
    pub compiler: String,
}

fn default_debounce() -> String {
    "1500ms".to_string()
}

fn default_source_extension() -> String {
    "go".to_string()
}

fn default_output_dir() -> String {
    "bin".to_string()
}

fn default_compiler() -> String {
    "go build".to_string()
}

impl Default for RunSection {
    fn default() -> Self {
        Self {
            reload_ignore: Vec::new(),
            debounce: default_debounce(),
            source_extension: default_source_extension(),
            output_dir: default_output_dir(),
            compiler: default_compiler(),
        }
    }
}

/// `[pack]` section: the pre-build swagger pipeline used with `--swagger`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackSection {
    #[serde(default = "default_swagger_command")]
    pub swagger_command: String,

    #[serde(default = "default_swagger_dir")]
    pub swagger_dir: String,

    #[serde(default = "default_pack_command")]
    pub pack_command: String,

    /// File written by the pack step; changes to it never trigger a rebuild.
    #[serde(default = "default_generated_file")]
    pub generated_file: String,
}

fn default_swagger_command() -> String {
    "gf swagger".to_string()
}

fn default_swagger_dir() -> String {
    "swagger".to_string()
}

fn default_pack_command() -> String {
    format!("gf pack swagger packed/{} -n packed -y", default_generated_file())
}

fn default_generated_file() -> String {
    "data-swagger.go".to_string()
}

impl Default for PackSection {
    fn default() -> Self {
        Self {
            swagger_command: default_swagger_command(),
            swagger_dir: default_swagger_dir(),
            pack_command: default_pack_command(),
            generated_file: default_generated_file(),
        }
    }
}

/// Validated configuration.
///
/// Only obtainable through `TryFrom<RawConfigFile>`, so holders can rely on
/// the invariants checked by [`validate_config`].
#[derive(Debug, Clone)]
pub struct ConfigFile {
    raw: RawConfigFile,
    debounce: Duration,
}

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = HotrunError;

    fn try_from(raw: RawConfigFile) -> Result<Self, Self::Error> {
        let debounce = validate_config(&raw)?;
        Ok(Self { raw, debounce })
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            raw: RawConfigFile::default(),
            debounce: crate::engine::DEFAULT_DEBOUNCE,
        }
    }
}

impl ConfigFile {
    pub fn pack_section(&self) -> &PackSection {
        &self.raw.pack
    }

    pub fn reload_ignore(&self) -> &[String] {
        &self.raw.run.reload_ignore
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    pub fn source_extension(&self) -> &str {
        &self.raw.run.source_extension
    }

    pub fn output_dir(&self) -> PathBuf {
        PathBuf::from(&self.raw.run.output_dir)
    }

    pub fn compiler(&self) -> &str {
        &self.raw.run.compiler
    }

    pub fn generated_file(&self) -> &str {
        &self.raw.pack.generated_file
    }
}
