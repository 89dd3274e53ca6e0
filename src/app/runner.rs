use std::sync::Arc;

use tokio::runtime::Handle;
use tracing::{debug, error, info};

use crate::args::BenchArgs;
use crate::error::{AppError, AppResult};
use crate::executor::{ExecutorFactory, HttpExecutorFactory};
use crate::metrics::{Aggregator, RunSummary};
use crate::pool::{PoolOptions, WorkerPool};
use crate::report::{print_final_report, setup_progress_reporter};
use crate::shutdown::StopFlag;
use crate::shutdown_handlers::setup_signal_shutdown_handler;
use crate::targets::TargetSet;

/// Runs a benchmark against real HTTP targets on the current runtime.
///
/// # Errors
///
/// Returns an error when no target matches the prefix, when the worker
/// threads cannot be created, or when a worker panics.
pub async fn run_local(args: BenchArgs) -> AppResult<RunSummary> {
    let factory = HttpExecutorFactory::new(Handle::current(), args.request_timeout, args.keepalive);
    run_with_factory(&args, factory).await
}

pub(super) async fn run_with_factory<F: ExecutorFactory>(
    args: &BenchArgs,
    factory: F,
) -> AppResult<RunSummary> {
    let targets = match TargetSet::load(&args.targets, &args.prefix) {
        Ok(targets) => targets,
        Err(err) => {
            error!("{}", err);
            return Err(AppError::validation(err));
        }
    };

    let workers = args.concurrency.get();
    let stop = StopFlag::new();
    let aggregator = Arc::new(Aggregator::new(
        args.requests.get(),
        args.histogram_capacity.get(),
        args.verbose,
        stop.clone(),
    ));
    let signal_handle = setup_signal_shutdown_handler(&stop);

    info!(
        "Starting {} workers against {} target(s), {} requests{}",
        workers,
        targets.len(),
        args.requests.get(),
        if args.keepalive { ", keep-alive" } else { "" }
    );

    let pool = match WorkerPool::launch(
        PoolOptions {
            workers,
            keep_alive: args.keepalive,
        },
        &targets,
        &aggregator,
        &Arc::new(factory),
    ) {
        Ok(pool) => pool,
        Err(err) => {
            if stop.trigger() {
                debug!("Launch aborted, releasing signal handler");
            }
            drop(signal_handle.await);
            return Err(AppError::pool(err));
        }
    };

    debug!("Worker pool running with {} threads", pool.len());
    let reporter = setup_progress_reporter(Arc::clone(&aggregator), workers);
    let joined = tokio::task::spawn_blocking(move || pool.await_all()).await?;

    if stop.trigger() {
        debug!("All workers exited before the run was stopped");
    }
    reporter.await?;
    signal_handle.await?;

    print_final_report(&aggregator, workers, args.verbose, args.json)?;

    let issued = joined?;
    info!("Run finished: {} requests dispatched", issued);
    Ok(aggregator.summary(workers))
}
