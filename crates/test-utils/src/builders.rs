#![allow(dead_code)]

use std::path::PathBuf;

use hotrun::config::{ConfigFile, RawConfigFile};
use hotrun::types::BuildTarget;

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn ignore(mut self, rule: &str) -> Self {
        self.config.run.reload_ignore.push(rule.to_string());
        self
    }

    pub fn debounce(mut self, s: &str) -> Self {
        self.config.run.debounce = s.to_string();
        self
    }

    pub fn source_extension(mut self, ext: &str) -> Self {
        self.config.run.source_extension = ext.to_string();
        self
    }

    pub fn compiler(mut self, compiler: &str) -> Self {
        self.config.run.compiler = compiler.to_string();
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `BuildTarget`.
pub struct BuildTargetBuilder {
    target: BuildTarget,
}

impl BuildTargetBuilder {
    pub fn new(source_file: impl Into<PathBuf>) -> Self {
        Self {
            target: BuildTarget::new(source_file),
        }
    }

    pub fn build_options(mut self, opts: &str) -> Self {
        self.target.build_options = opts.to_string();
        self
    }

    pub fn run_args(mut self, args: &str) -> Self {
        self.target.run_args = args.to_string();
        self
    }

    pub fn swagger(mut self, val: bool) -> Self {
        self.target.swagger = val;
        self
    }

    pub fn build(self) -> BuildTarget {
        self.target
    }
}
