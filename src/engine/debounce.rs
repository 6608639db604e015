// src/engine/debounce.rs

//! Collapses bursts of change events into a single rebuild.
//!
//! A single dirty flag gates everything: the first accepted event flips it
//! from `false` to `true` and schedules one rebuild after a short delay.
//! Every event that arrives while the flag is set is dropped. The flag is
//! cleared only after the rebuild has finished, so cycles never overlap.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::engine::Rebuilder;
use crate::types::ChangeEvent;

/// Default delay between the first accepted change and the rebuild.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(1500);

/// Handle for a scheduled timer task.
///
/// The debouncer never cancels its timers; the handle exists so callers (and
/// tests) can observe or await the scheduled cycle.
#[derive(Debug)]
pub struct TimerHandle {
    inner: JoinHandle<()>,
}

impl TimerHandle {
    pub fn cancel(&self) {
        self.inner.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }

    /// Wait for the timer task. Returns `false` if it was cancelled.
    pub async fn join(self) -> bool {
        self.inner.await.is_ok()
    }
}

/// Run `fut` on a background task after `delay`.
pub fn schedule_after<F>(delay: Duration, fut: F) -> TimerHandle
where
    F: Future<Output = ()> + Send + 'static,
{
    let inner = tokio::spawn(async move {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        fut.await;
    });
    TimerHandle { inner }
}

/// Clears the dirty flag when the scheduled cycle ends, however it ends.
struct ResetOnDrop(Arc<AtomicBool>);

impl Drop for ResetOnDrop {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct Debouncer {
    dirty: Arc<AtomicBool>,
    delay: Duration,
    target: Arc<dyn Rebuilder>,
}

impl std::fmt::Debug for Debouncer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("dirty", &self.is_dirty())
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}

impl Debouncer {
    pub fn new(delay: Duration, target: Arc<dyn Rebuilder>) -> Self {
        Self {
            dirty: Arc::new(AtomicBool::new(false)),
            delay,
            target,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// True from an accepted trigger until its rebuild completes.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    /// Offer a (filtered) change event.
    ///
    /// Returns the timer handle if this event opened a new cycle, `None` if
    /// a cycle was already pending or running.
    pub fn on_change(&self, event: &ChangeEvent) -> Option<TimerHandle> {
        if !self.try_mark_dirty() {
            debug!(%event, "rebuild already pending; dropping event");
            return None;
        }

        let event = event.clone();
        Some(self.schedule(self.delay, move || {
            info!("source file changes: {event}");
        }))
    }

    /// Start a cycle right away, e.g. for the initial build.
    ///
    /// Goes through the same dirty flag so it never overlaps a debounced
    /// cycle.
    pub fn trigger_now(&self) -> Option<TimerHandle> {
        if !self.try_mark_dirty() {
            debug!("rebuild already pending; skipping immediate trigger");
            return None;
        }
        Some(self.schedule(Duration::ZERO, || {}))
    }

    fn try_mark_dirty(&self) -> bool {
        self.dirty
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    fn schedule<F>(&self, delay: Duration, before: F) -> TimerHandle
    where
        F: FnOnce() + Send + 'static,
    {
        let guard = ResetOnDrop(Arc::clone(&self.dirty));
        let target = Arc::clone(&self.target);

        schedule_after(delay, async move {
            let _guard = guard;
            before();
            target.trigger_rebuild().await;
        })
    }
}
