//! Run statistics: the shared aggregator, the bounded status histogram, and
//! the snapshot/summary types read by the reporter.
mod aggregator;
mod histogram;
mod types;


pub use aggregator::Aggregator;
pub use histogram::{StatusCount, StatusHistogram};
pub use types::{RunSummary, Snapshot, per_second};
