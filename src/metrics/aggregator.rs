use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};
use std::time::{Duration, Instant};

use crate::executor::{FailureKind, Outcome, RequestFailure};
use crate::shutdown::StopFlag;

use super::{RunSummary, Snapshot, StatusHistogram};

/// Shared counters every worker records into.
///
/// Completions are claimed with a compare-and-swap against the request
/// budget, so concurrent workers can never push `completed` past it. The
/// status histogram is the only state behind a lock.
#[derive(Debug)]
pub struct Aggregator {
    request_budget: u64,
    verbose: bool,
    completed: AtomicU64,
    failures: AtomicU64,
    bytes: AtomicU64,
    histogram: Mutex<StatusHistogram>,
    started_at: OnceLock<Instant>,
    fatal_error: OnceLock<String>,
    stop: StopFlag,
}

impl Aggregator {
    #[must_use]
    pub fn new(
        request_budget: u64,
        histogram_capacity: usize,
        verbose: bool,
        stop: StopFlag,
    ) -> Self {
        Self {
            request_budget,
            verbose,
            completed: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            bytes: AtomicU64::new(0),
            histogram: Mutex::new(StatusHistogram::with_capacity(histogram_capacity)),
            started_at: OnceLock::new(),
            fatal_error: OnceLock::new(),
            stop,
        }
    }

    /// Latches the run start time. Only the first call has an effect and
    /// returns `true`.
    #[must_use]
    pub fn mark_started(&self) -> bool {
        self.started_at.set(Instant::now()).is_ok()
    }

    pub fn record(&self, outcome: Outcome) {
        match outcome {
            Outcome::Success { status, bytes } => self.record_success(status, bytes),
            Outcome::Failure(failure) => self.record_failure(failure),
        }
    }

    fn record_success(&self, status: u16, bytes: u64) {
        let budget = self.request_budget;
        let claimed = self
            .completed
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |done| {
                if done >= budget {
                    None
                } else {
                    Some(done.saturating_add(1))
                }
            });
        if claimed.is_err() {
            if self.stop.trigger() {
                tracing::debug!("Request budget of {} reached", budget);
            }
            return;
        }

        self.bytes.fetch_add(bytes, Ordering::Relaxed);

        let overflow = self.lock_histogram().record(status);
        if let Err(err) = overflow {
            self.fail_run(err.to_string());
        }
    }

    fn record_failure(&self, failure: RequestFailure) {
        self.failures.fetch_add(1, Ordering::Relaxed);
        match failure.kind {
            FailureKind::Fatal => self.fail_run(failure.message),
            FailureKind::Recoverable => {
                if self.verbose {
                    eprintln!("ERROR: {}", failure.message);
                } else {
                    tracing::trace!("Request failed: {}", failure.message);
                }
            }
        }
    }

    fn fail_run(&self, message: String) {
        eprintln!("FATAL ERROR: {}", message);
        if let Err(message) = self.fatal_error.set(message) {
            tracing::debug!("Additional fatal error after the first: {}", message);
        }
        if self.stop.trigger() {
            tracing::debug!("Run stopped by a fatal error");
        }
    }

    fn lock_histogram(&self) -> MutexGuard<'_, StatusHistogram> {
        self.histogram
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn completed(&self) -> u64 {
        self.completed.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn bytes(&self) -> u64 {
        self.bytes.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn started_at(&self) -> Option<Instant> {
        self.started_at.get().copied()
    }

    #[must_use]
    pub fn fatal_error(&self) -> Option<&str> {
        self.fatal_error.get().map(String::as_str)
    }

    #[must_use]
    pub const fn stop_flag(&self) -> &StopFlag {
        &self.stop
    }

    /// Copy of the status histogram, in first-seen order.
    #[must_use]
    pub fn histogram(&self) -> StatusHistogram {
        self.lock_histogram().clone()
    }

    /// Reads the counters; `elapsed` is zero until a worker latched the start.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            completed: self.completed(),
            failures: self.failures(),
            bytes: self.bytes(),
            elapsed: self
                .started_at()
                .map_or(Duration::ZERO, |started| started.elapsed()),
        }
    }

    #[must_use]
    pub fn summary(&self, workers: usize) -> RunSummary {
        let snapshot = self.snapshot();
        RunSummary {
            workers,
            completed: snapshot.completed,
            failures: snapshot.failures,
            bytes: snapshot.bytes,
            elapsed_ms: u64::try_from(snapshot.elapsed.as_millis()).unwrap_or(u64::MAX),
            requests_per_sec: snapshot.requests_per_sec(),
            bytes_per_sec: snapshot.bytes_per_sec(),
            statuses: self.histogram().entries().to_vec(),
            fatal_error: self.fatal_error().map(str::to_owned),
        }
    }
}

