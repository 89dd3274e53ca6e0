use std::time::Duration;

use serde::Serialize;

use super::StatusCount;

/// Point-in-time read of the aggregator counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub completed: u64,
    pub failures: u64,
    pub bytes: u64,
    pub elapsed: Duration,
}

impl Snapshot {
    #[must_use]
    pub fn requests_per_sec(&self) -> u64 {
        per_second(self.completed, self.elapsed)
    }

    #[must_use]
    pub fn bytes_per_sec(&self) -> u64 {
        per_second(self.bytes, self.elapsed)
    }
}

/// Average rate over `elapsed`; zero before any time has passed.
#[must_use]
pub fn per_second(total: u64, elapsed: Duration) -> u64 {
    let elapsed_ms = elapsed.as_millis();
    let rate = u128::from(total)
        .saturating_mul(1000)
        .checked_div(elapsed_ms)
        .unwrap_or(0);
    u64::try_from(rate).unwrap_or(u64::MAX)
}

/// Final numbers of a run, as printed with `--json`.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub workers: usize,
    pub completed: u64,
    pub failures: u64,
    pub bytes: u64,
    pub elapsed_ms: u64,
    pub requests_per_sec: u64,
    pub bytes_per_sec: u64,
    pub statuses: Vec<StatusCount>,
    pub fatal_error: Option<String>,
}
