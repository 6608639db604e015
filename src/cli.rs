// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::types::BuildTarget;

/// Command-line arguments for `hotrun`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "hotrun",
    version,
    about = "Rebuild and restart a program whenever its sources change.",
    long_about = None
)]
pub struct CliArgs {
    /// Entry source file to build, e.g. `main.go`.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Extra options passed through to the compiler, e.g. `-mod=vendor`.
    ///
    /// Everything after FILE is taken verbatim, so hotrun's own flags must
    /// come first: `hotrun --swagger main.go -mod=vendor`.
    #[arg(value_name = "BUILD_OPTIONS", trailing_var_arg = true, allow_hyphen_values = true)]
    pub build_options: Vec<String>,

    /// Arguments for the built program, e.g. `--args "server -p 8080"`.
    #[arg(long, value_name = "ARGS", allow_hyphen_values = true, default_value = "")]
    pub args: String,

    /// Generate and pack swagger files before every build.
    #[arg(long)]
    pub swagger: bool,

    /// Path to the config file (TOML).
    ///
    /// Default: `hotrun.toml` in the watch root, if it exists.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory to watch. Defaults to the current working directory.
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `HOTRUN_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Resolve config and watch directories, print them, and exit.
    #[arg(long)]
    pub dry_run: bool,
}

impl CliArgs {
    pub fn build_target(&self) -> BuildTarget {
        BuildTarget {
            source_file: self.file.clone(),
            build_options: self.build_options.join(" "),
            run_args: self.args.clone(),
            swagger: self.swagger,
        }
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
