// src/watch/watcher.rs

use std::sync::Arc;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, info, warn};

use crate::engine::Debouncer;
use crate::errors::{HotrunError, Result};
use crate::types::ChangeEvent;
use crate::watch::filter::EventFilter;
use crate::watch::watch_set::WatchPlan;

/// Keeps the OS watcher registered. Dropping it stops all watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
    watched: usize,
}

impl WatcherHandle {
    /// Number of directories registered with the OS watcher.
    pub fn watched_dirs(&self) -> usize {
        self.watched
    }
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle")
            .field("watched", &self.watched)
            .finish()
    }
}

/// Feed one raw notify event through the filter into the debouncer.
pub fn dispatch_event(event: &Event, filter: &EventFilter, debouncer: &Debouncer) {
    for change in ChangeEvent::from_notify(event) {
        if filter.accepts(&change) {
            debouncer.on_change(&change);
        }
    }
}

/// Register every directory in `plan` with a `notify` watcher and route the
/// resulting events through `filter` into `debouncer`.
///
/// Any registration failure is fatal and returned as `WatchError`; no
/// partial watcher is kept.
pub fn spawn_watcher(
    plan: &WatchPlan,
    filter: EventFilter,
    debouncer: Arc<Debouncer>,
) -> Result<WatcherHandle> {
    let (event_tx, mut event_rx) = tokio::sync::mpsc::unbounded_channel::<Event>();

    // notify calls this on its own thread.
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if event_tx.send(event).is_err() {
                    debug!("event loop gone; dropping notify event");
                }
            }
            Err(err) => warn!("file watch error: {err}"),
        },
        Config::default(),
    )?;

    let mode = if plan.recursive {
        RecursiveMode::Recursive
    } else {
        RecursiveMode::NonRecursive
    };

    for dir in &plan.dirs {
        watcher
            .watch(dir, mode)
            .map_err(|e| HotrunError::WatchError(format!("watching {:?}: {e}", dir)))?;
        debug!(?dir, ?mode, "watching directory");
    }

    info!(
        dirs = plan.dirs.len(),
        recursive = plan.recursive,
        "file watcher started on {:?}",
        filter.root()
    );

    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            debug!(?event, "received notify event");
            dispatch_event(&event, &filter, &debouncer);
        }
        warn!("watcher event loop finished");
    });

    Ok(WatcherHandle {
        _inner: watcher,
        watched: plan.dirs.len(),
    })
}
