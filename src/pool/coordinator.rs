use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, error, warn};

use crate::error::PoolError;
use crate::executor::ExecutorFactory;
use crate::metrics::Aggregator;
use crate::targets::TargetSet;

use super::gate::{GateHandle, StartGate, start_gate};
use super::worker::Worker;

pub(super) type WorkerTask = Box<dyn FnOnce() -> u64 + Send + 'static>;

#[derive(Debug, Clone, Copy)]
pub struct PoolOptions {
    pub workers: usize,
    pub keep_alive: bool,
}

/// Running worker threads, released together and joined by [`WorkerPool::await_all`].
#[derive(Debug)]
pub struct WorkerPool {
    handles: Vec<(usize, JoinHandle<u64>)>,
}

impl WorkerPool {
    /// Spawns `options.workers` threads parked on their start gates, then
    /// releases them all at once.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::ThreadCreation`] when a thread cannot be spawned.
    /// Workers created before the failure are released without issuing a
    /// request and joined before returning.
    pub fn launch<F: ExecutorFactory>(
        options: PoolOptions,
        targets: &TargetSet,
        aggregator: &Arc<Aggregator>,
        factory: &Arc<F>,
    ) -> Result<Self, PoolError> {
        Self::launch_with(options, targets, aggregator, factory, spawn_worker_thread)
    }

    pub(super) fn launch_with<F, S>(
        options: PoolOptions,
        targets: &TargetSet,
        aggregator: &Arc<Aggregator>,
        factory: &Arc<F>,
        mut spawn: S,
    ) -> Result<Self, PoolError>
    where
        F: ExecutorFactory,
        S: FnMut(usize, WorkerTask) -> std::io::Result<JoinHandle<u64>>,
    {
        let mut handles = Vec::with_capacity(options.workers);
        let mut gates: Vec<GateHandle> = Vec::with_capacity(options.workers);

        for id in 0..options.workers {
            let (gate_handle, gate) = start_gate();
            let worker = Worker::new(
                id,
                targets.clone(),
                Arc::clone(aggregator),
                aggregator.stop_flag().clone(),
                Arc::clone(factory),
                options.keep_alive,
            );

            match spawn(id, gated_task(id, gate, worker)) {
                Ok(handle) => {
                    handles.push((id, handle));
                    gates.push(gate_handle);
                }
                Err(err) => {
                    error!("Couldn't create worker thread {}: {}", id, err);
                    drop(gates);
                    let pool = Self { handles };
                    if let Err(join_err) = pool.await_all() {
                        warn!("While aborting launch: {}", join_err);
                    }
                    return Err(PoolError::ThreadCreation {
                        worker: id,
                        source: err,
                    });
                }
            }
        }

        for (id, gate) in gates.into_iter().enumerate() {
            if !gate.open() {
                warn!("Worker {} exited before the start gate opened", id);
            }
        }
        debug!("Released {} workers", handles.len());

        Ok(Self { handles })
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.handles.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Joins every worker. Returns the total number of requests dispatched.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::WorkerPanicked`] for the first worker that
    /// panicked, after all workers have been joined.
    pub fn await_all(self) -> Result<u64, PoolError> {
        let mut issued: u64 = 0;
        let mut panicked: Option<usize> = None;

        for (id, handle) in self.handles {
            match handle.join() {
                Ok(count) => issued = issued.saturating_add(count),
                Err(_) => {
                    error!("Worker {} panicked", id);
                    if panicked.is_none() {
                        panicked = Some(id);
                    }
                }
            }
        }

        panicked.map_or(Ok(issued), |worker| {
            Err(PoolError::WorkerPanicked { worker })
        })
    }
}

fn gated_task<F: ExecutorFactory>(id: usize, gate: StartGate, worker: Worker<F>) -> WorkerTask {
    Box::new(move || {
        if !gate.wait() {
            debug!("Worker {} dropped before start", id);
            return 0;
        }
        worker.run()
    })
}

fn spawn_worker_thread(id: usize, task: WorkerTask) -> std::io::Result<JoinHandle<u64>> {
    thread::Builder::new()
        .name(format!("rrbench-worker-{}", id))
        .spawn(task)
}
