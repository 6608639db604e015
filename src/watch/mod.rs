// src/watch/mod.rs

//! File watching and change filtering.
//!
//! This module is responsible for:
//! - Parsing reload-ignore rules into compiled matchers.
//! - Choosing which directories to register with the OS watcher.
//! - Filtering raw change events down to the ones that should rebuild.
//! - Wiring up a cross-platform filesystem watcher (`notify`).
//!
//! It does **not** build or run anything; accepted events are handed to the
//! engine's debouncer.

pub mod filter;
pub mod path_utils;
pub mod patterns;
pub mod watch_set;
pub mod watcher;

pub use filter::EventFilter;
pub use patterns::{IgnoreRule, IgnoreRules};
pub use watch_set::{WatchPlan, compute_watch_dirs};
pub use watcher::{WatcherHandle, dispatch_event, spawn_watcher};
