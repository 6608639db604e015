// src/engine/mod.rs

//! Rebuild orchestration for hotrun.
//!
//! - [`debounce`] turns a stream of accepted change events into at most one
//!   pending rebuild at a time.
//! - [`supervisor`] owns the build → kill → launch cycle and the single live
//!   child process.
//! - [`platform`] holds the per-platform capabilities chosen at startup.

pub mod debounce;
pub mod platform;
pub mod supervisor;

use crate::exec::backend::BoxFuture;

/// Something the debouncer can ask to rebuild.
///
/// Production code uses [`BuildSupervisor`]; tests can provide a counter.
pub trait Rebuilder: Send + Sync + 'static {
    fn trigger_rebuild(&self) -> BoxFuture<'_, ()>;
}

pub use debounce::{DEFAULT_DEBOUNCE, Debouncer, TimerHandle, schedule_after};
pub use platform::{LaunchStrategy, PlatformProfile};
pub use supervisor::{BuildSupervisor, RebuildOutcome, SupervisedProcess, SupervisorState};
