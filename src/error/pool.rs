use thiserror::Error;

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("Couldn't create worker thread {worker}: {source}")]
    ThreadCreation {
        worker: usize,
        #[source]
        source: std::io::Error,
    },
    #[error("Worker thread {worker} panicked.")]
    WorkerPanicked { worker: usize },
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
