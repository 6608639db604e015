// src/exec/backend.rs

//! Pluggable collaborator abstractions for the build supervisor.
//!
//! The supervisor talks to a `Compiler`, a `ProcessLauncher` and an optional
//! `Packer` instead of spawning processes itself. This makes it easy to swap
//! in fakes in tests while keeping the production implementations in
//! [`command`](super::command) and [`process`](super::process).

use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use crate::errors::Result;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Turns the entry source file into a binary.
pub trait Compiler: Send + Sync {
    /// Compile `source` into `output` with the opaque `options` string.
    ///
    /// On success returns the compiler's combined output. On failure the
    /// error is a `HotrunError::BuildError` carrying that output.
    fn compile<'a>(
        &'a self,
        output: &'a Path,
        options: &'a str,
        source: &'a Path,
    ) -> BoxFuture<'a, Result<String>>;
}

/// A started child process.
pub trait ProcessHandle: Send {
    fn pid(&self) -> u32;

    /// Terminate the process together with everything it spawned.
    fn kill(&mut self) -> BoxFuture<'_, Result<()>>;
}

/// Starts the freshly built binary.
pub trait ProcessLauncher: Send + Sync {
    fn start<'a>(
        &'a self,
        program: &'a Path,
        args: &'a str,
    ) -> BoxFuture<'a, Result<Box<dyn ProcessHandle>>>;
}

/// Pre-build packing pipeline (swagger generation + packing).
pub trait Packer: Send + Sync {
    fn pack(&self) -> BoxFuture<'_, Result<()>>;
}
