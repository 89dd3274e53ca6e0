use tokio::task::JoinHandle;

use crate::shutdown::StopFlag;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Sets `stop` on Ctrl+C (and SIGTERM on unix). Exits once `stop` is set by
/// anyone.
pub fn setup_signal_shutdown_handler(stop: &StopFlag) -> JoinHandle<()> {
    let stop = stop.clone();
    tokio::spawn(async move {
        #[cfg(unix)]
        let mut term_signal = match signal(SignalKind::terminate()) {
            Ok(signal) => Some(signal),
            Err(err) => {
                eprintln!("Failed to register SIGTERM handler: {}", err);
                None
            }
        };

        #[cfg(unix)]
        {
            tokio::select! {
                () = stop.wait() => {}
                _ = tokio::signal::ctrl_c() => {
                    if stop.trigger() {
                        tracing::info!("Interrupted, stopping workers");
                    }
                }
                () = async {
                    if let Some(signal) = term_signal.as_mut() {
                        signal.recv().await;
                    } else {
                        std::future::pending::<()>().await;
                    }
                } => {
                    if stop.trigger() {
                        tracing::info!("Terminated, stopping workers");
                    }
                }
            }
        }

        #[cfg(not(unix))]
        {
            tokio::select! {
                () = stop.wait() => {}
                _ = tokio::signal::ctrl_c() => {
                    if stop.trigger() {
                        tracing::info!("Interrupted, stopping workers");
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, AppResult, ValidationError};
    use std::future::Future;
    use std::time::Duration;

    const SIGNAL_HANDLER_SETTLE: Duration = Duration::from_millis(10);
    const SHUTDOWN_HANDLER_TIMEOUT: Duration = Duration::from_secs(1);

    fn run_async_test<F>(future: F) -> AppResult<()>
    where
        F: Future<Output = AppResult<()>>,
    {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| AppError::validation(ValidationError::RuntimeBuildFailed { source: err }))?;
        runtime.block_on(future)
    }

    #[test]
    fn signal_handler_exits_on_stop() -> AppResult<()> {
        run_async_test(async {
            let stop = StopFlag::new();
            let handle = setup_signal_shutdown_handler(&stop);

            tokio::time::sleep(SIGNAL_HANDLER_SETTLE).await;
            if !stop.trigger() {
                return Err(AppError::validation("Flag was already set"));
            }

            tokio::time::timeout(SHUTDOWN_HANDLER_TIMEOUT, handle)
                .await
                .map_err(|err| {
                    AppError::validation(format!("Timed out waiting for signal handler: {}", err))
                })??;
            Ok(())
        })
    }
}
