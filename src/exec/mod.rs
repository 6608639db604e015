// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`backend`] defines the collaborator traits the supervisor depends on.
//! - [`command`] runs the compiler and the packing pipeline with
//!   `tokio::process::Command`.
//! - [`process`] starts the built binary in its own process group.

pub mod backend;
pub mod command;
pub mod process;

pub use backend::{Compiler, Packer, ProcessHandle, ProcessLauncher};
pub use command::{CommandCompiler, ShellPacker};
pub use process::{GroupLauncher, GroupProcess};
