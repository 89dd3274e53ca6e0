//! The run-wide termination flag.
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Notify;

/// Shared stop signal: flips false to true exactly once.
///
/// Workers poll [`StopFlag::is_set`] at the top of every iteration; async
/// tasks can await [`StopFlag::wait`] instead.
#[derive(Debug, Clone, Default)]
pub struct StopFlag {
    inner: Arc<StopState>,
}

#[derive(Debug, Default)]
struct StopState {
    stopped: AtomicBool,
    notify: Notify,
}

impl StopFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the flag. Returns `true` only for the call that performed the
    /// transition.
    #[must_use]
    pub fn trigger(&self) -> bool {
        let transitioned = self
            .inner
            .stopped
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if transitioned {
            self.inner.notify.notify_waiters();
        }
        transitioned
    }

    #[must_use]
    pub fn is_set(&self) -> bool {
        self.inner.stopped.load(Ordering::Acquire)
    }

    /// Resolves once the flag has been set.
    pub async fn wait(&self) {
        loop {
            let notified = self.inner.notify.notified();
            if self.is_set() {
                return;
            }
            notified.await;
        }
    }
}
