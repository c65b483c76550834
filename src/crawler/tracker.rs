//! Outstanding-task accounting for completion detection
//!
//! There is no central queue to drain: a run is finished when every spawned
//! task has finished. Each task holds a [`TaskGuard`] taken *before* it is
//! spawned, and the count only drops when the guard is dropped, so a parent
//! always registers its children before releasing its own slot.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Counter of spawned-but-unfinished crawl tasks
#[derive(Debug, Default)]
pub struct InFlight {
    count: AtomicUsize,
    idle: Notify,
}

impl InFlight {
    /// Creates a tracker with nothing outstanding
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Registers one outstanding task and returns its guard
    pub fn enter(self: &Arc<Self>) -> TaskGuard {
        self.count.fetch_add(1, Ordering::SeqCst);
        TaskGuard {
            tracker: Arc::clone(self),
        }
    }

    /// Number of outstanding tasks
    pub fn outstanding(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Waits until no task is outstanding
    ///
    /// Returns immediately if nothing was ever entered.
    pub async fn wait_idle(&self) {
        // notify_one stores a permit, so a drop to zero between the load and
        // the await still wakes us
        while self.outstanding() != 0 {
            self.idle.notified().await;
        }
    }

    fn exit(&self) {
        if self.count.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.idle.notify_one();
        }
    }
}

/// Marks one task as outstanding until dropped
///
/// Dropping happens on every exit path of the task, including a panic.
#[derive(Debug)]
pub struct TaskGuard {
    tracker: Arc<InFlight>,
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        self.tracker.exit();
    }
}
