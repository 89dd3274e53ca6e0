use std::sync::Arc;

use tracing::debug;

use crate::executor::{ExecutorFactory, Outcome, RequestExecutor};
use crate::metrics::Aggregator;
use crate::shutdown::StopFlag;
use crate::targets::TargetSet;

/// One request loop. Owns its cursor and executor handle; shares only the
/// targets, the aggregator, and the stop flag.
pub struct Worker<F: ExecutorFactory> {
    id: usize,
    targets: TargetSet,
    aggregator: Arc<Aggregator>,
    stop: StopFlag,
    factory: Arc<F>,
    keep_alive: bool,
}

impl<F: ExecutorFactory> Worker<F> {
    #[must_use]
    pub const fn new(
        id: usize,
        targets: TargetSet,
        aggregator: Arc<Aggregator>,
        stop: StopFlag,
        factory: Arc<F>,
        keep_alive: bool,
    ) -> Self {
        Self {
            id,
            targets,
            aggregator,
            stop,
            factory,
            keep_alive,
        }
    }

    /// Issues requests until the stop flag is set. Returns how many requests
    /// this worker dispatched.
    pub fn run(self) -> u64 {
        if self.aggregator.mark_started() {
            debug!("Worker {} latched the run start time", self.id);
        }

        let mut cursor = self.targets.cursor();
        let mut cached: Option<F::Executor> = None;
        let mut issued: u64 = 0;

        while !self.stop.is_set() {
            let mut executor = match cached.take() {
                Some(executor) => executor,
                None => match self.factory.build() {
                    Ok(executor) => executor,
                    Err(failure) => {
                        self.aggregator.record(Outcome::Failure(failure));
                        continue;
                    }
                },
            };

            let Some(target) = cursor.next_target() else {
                break;
            };
            let outcome = executor.perform(target);
            issued = issued.saturating_add(1);
            self.aggregator.record(outcome);

            if self.keep_alive {
                cached = Some(executor);
            }
        }

        debug!("Worker {} exiting after {} requests", self.id, issued);
        issued
    }
}
