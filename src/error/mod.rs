mod app;
mod config;
mod metrics;
mod pool;
mod validation;

#[cfg(test)]
mod test_support;

pub use app::{AppError, AppResult};
pub use config::ConfigError;
pub use metrics::MetricsError;
pub use pool::PoolError;
pub use validation::ValidationError;
