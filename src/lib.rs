//! Core library for the `rrbench` CLI.
//!
//! A fixed pool of worker threads issues requests against a round-robin list
//! of targets, records every outcome into one shared [`metrics::Aggregator`],
//! and stops cooperatively once the request budget is spent or a fatal error
//! occurs. The transport sits behind [`executor::RequestExecutor`]; the
//! binary plugs in the `reqwest`-based [`executor::HttpExecutor`].
pub mod args;
pub mod config;
pub mod error;
pub mod executor;
pub mod metrics;
pub mod pool;
pub mod report;
pub mod shutdown;
pub mod targets;

mod app;
mod entry;
mod logger;
mod shutdown_handlers;

pub use app::run_local;
pub use entry::run;
