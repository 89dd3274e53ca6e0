use clap::Parser;
use std::time::Duration;

use super::parsers::{parse_duration_arg, parse_positive};
use super::types::{PositiveU64, PositiveUsize};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Thread-per-worker HTTP load generator - round-robin targets, lock-free counters, live throughput and status-code breakdown."
)]
pub struct BenchArgs {
    /// Number of concurrent workers (one OS thread each)
    #[arg(long = "concurrency", short = 'c', default_value = "10", value_parser = parse_positive::<PositiveUsize>)]
    pub concurrency: PositiveUsize,

    /// Total number of requests to complete before stopping
    #[arg(long = "requests", short = 'n', default_value = "10000", value_parser = parse_positive::<PositiveU64>)]
    pub requests: PositiveU64,

    /// Reuse each worker's connection between requests
    #[arg(long = "keepalive", short = 'k')]
    pub keepalive: bool,

    /// Report recoverable errors and print the status code breakdown at the end
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Only arguments starting with this prefix are used as targets
    #[arg(long = "prefix", default_value = "http")]
    pub prefix: String,

    /// Maximum number of distinct status codes tracked before the run aborts
    #[arg(long = "histogram-capacity", default_value = "10", value_parser = parse_positive::<PositiveUsize>)]
    pub histogram_capacity: PositiveUsize,

    /// Per-request timeout (supports ms/s/m/h)
    #[arg(long = "timeout", default_value = "30s", value_parser = parse_duration_arg)]
    pub request_timeout: Duration,

    /// Print the final summary as JSON on stdout
    #[arg(long = "json")]
    pub json: bool,

    /// Path to a TOML or JSON config file
    #[arg(long = "config", env = "RRBENCH_CONFIG")]
    pub config: Option<String>,

    /// Target URLs, requested in round-robin order
    #[arg(value_name = "TARGET")]
    pub targets: Vec<String>,
}
