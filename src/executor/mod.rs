//! Request execution seam: outcome types, executor traits, and the HTTP
//! implementation used by the binary.
mod http;

#[cfg(test)]
mod tests;

use crate::targets::Target;

pub use http::{DEFAULT_USER_AGENT, HttpExecutor, HttpExecutorFactory};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Counted, then the run continues.
    Recoverable,
    /// Counted, then the whole run stops.
    Fatal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl RequestFailure {
    #[must_use]
    pub fn recoverable(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Recoverable,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn fatal(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Fatal,
            message: message.into(),
        }
    }
}

/// Result of a single request attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success { status: u16, bytes: u64 },
    Failure(RequestFailure),
}

/// Performs one request against a target. Implementations may keep
/// connection state between calls; dropping the executor releases it.
pub trait RequestExecutor {
    fn perform(&mut self, target: &Target) -> Outcome;
}

/// Builds executors on the worker threads that own them.
pub trait ExecutorFactory: Send + Sync + 'static {
    type Executor: RequestExecutor;

    /// Creates a fresh executor handle.
    ///
    /// # Errors
    ///
    /// Returns a failure when the underlying client cannot be constructed;
    /// the worker records it like any other failed request.
    fn build(&self) -> Result<Self::Executor, RequestFailure>;
}
