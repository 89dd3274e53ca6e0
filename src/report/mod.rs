//! Live throughput line and the end-of-run report.
mod lines;

#[cfg(test)]
mod tests;

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

use crate::error::AppResult;
use crate::metrics::Aggregator;

pub use lines::{format_progress_line, format_status_breakdown};

/// Live report cadence.
pub const REPORT_INTERVAL: Duration = Duration::from_secs(1);

/// Prints one progress line per [`REPORT_INTERVAL`] until the stop flag is set.
#[must_use]
pub fn setup_progress_reporter(aggregator: Arc<Aggregator>, workers: usize) -> JoinHandle<()> {
    let stop = aggregator.stop_flag().clone();

    tokio::spawn(async move {
        let first_tick = Instant::now()
            .checked_add(REPORT_INTERVAL)
            .unwrap_or_else(Instant::now);
        let mut ticker = interval_at(first_tick, REPORT_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                () = stop.wait() => break,
                _ = ticker.tick() => {
                    println!("{}", format_progress_line(workers, &aggregator.snapshot()));
                }
            }
        }
        tracing::debug!("Progress reporter stopped");
    })
}

/// Prints the closing summary produced by [`render_final_report`].
///
/// # Errors
///
/// Returns an error when the JSON summary cannot be serialized.
pub fn print_final_report(
    aggregator: &Aggregator,
    workers: usize,
    verbose: bool,
    json: bool,
) -> AppResult<()> {
    print!("{}", render_final_report(aggregator, workers, verbose, json)?);
    Ok(())
}

/// Renders the closing summary: the final progress line, then the status
/// breakdown in verbose mode, or the whole summary as JSON.
///
/// # Errors
///
/// Returns an error when the JSON summary cannot be serialized.
pub fn render_final_report(
    aggregator: &Aggregator,
    workers: usize,
    verbose: bool,
    json: bool,
) -> AppResult<String> {
    if json {
        let mut rendered = serde_json::to_string_pretty(&aggregator.summary(workers))?;
        rendered.push('\n');
        return Ok(rendered);
    }

    let mut rendered = format_progress_line(workers, &aggregator.snapshot());
    rendered.push('\n');
    if verbose {
        rendered.push_str(&format_status_breakdown(
            &aggregator.histogram(),
            aggregator.completed(),
        ));
    }
    Ok(rendered)
}
