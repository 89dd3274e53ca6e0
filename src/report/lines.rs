use std::fmt::Write as _;

use crate::metrics::{Snapshot, StatusHistogram};

#[must_use]
pub fn format_progress_line(workers: usize, snapshot: &Snapshot) -> String {
    let elapsed_ms = snapshot.elapsed.as_millis();
    let secs = elapsed_ms.checked_div(1000).unwrap_or(0);
    let hundredths = elapsed_ms
        .checked_rem(1000)
        .and_then(|millis| millis.checked_div(10))
        .unwrap_or(0);

    format!(
        "threads {}, reqs {} ({} reqs/s avg), TX {} ({} bytes/s avg), fails {}, {}.{:02} secs",
        workers,
        snapshot.completed,
        snapshot.requests_per_sec(),
        snapshot.bytes,
        snapshot.bytes_per_sec(),
        snapshot.failures,
        secs,
        hundredths
    )
}

/// Status codes in first-seen order with their share of `completed`.
#[must_use]
pub fn format_status_breakdown(histogram: &StatusHistogram, completed: u64) -> String {
    let mut out = String::from("\nHTTP responses:\n");
    for entry in histogram.entries() {
        let share_x100 = u128::from(entry.count)
            .saturating_mul(10_000)
            .checked_div(u128::from(completed))
            .unwrap_or(0);
        let whole = share_x100.checked_div(100).unwrap_or(0);
        let frac = share_x100.checked_rem(100).unwrap_or(0);
        // Writing into a String cannot fail.
        let _written = writeln!(
            out,
            "  HTTP {}: {} ({}.{:02}%)",
            entry.code, entry.count, whole, frac
        );
    }
    out
}
