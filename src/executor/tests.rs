use super::*;
use crate::error::{AppError, AppResult, ValidationError};
use crate::targets::TargetSet;
use std::io::{Read, Write};
use std::net::{Shutdown, TcpListener};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

fn runtime() -> AppResult<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .map_err(|err| AppError::validation(ValidationError::RuntimeBuildFailed { source: err }))
}

fn single_target(raw: &str) -> AppResult<Target> {
    let set = TargetSet::load([raw], "")?;
    set.iter()
        .next()
        .cloned()
        .ok_or_else(|| AppError::validation("Missing target"))
}

/// Answers the first `connections` connections with `response`.
fn spawn_canned_server(
    response: &'static [u8],
    connections: usize,
) -> AppResult<(String, std::thread::JoinHandle<()>)> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    let handle = std::thread::spawn(move || {
        for _ in 0..connections {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };
            let mut buffer = [0u8; 1024];
            if stream.read(&mut buffer).is_err() {
                continue;
            }
            if stream.write_all(response).is_err() {
                continue;
            }
            drop(stream.flush());
            drop(stream.shutdown(Shutdown::Both));
        }
    });
    Ok((format!("http://{}/", addr), handle))
}

#[test]
fn http_executor_counts_body_bytes() -> AppResult<()> {
    let runtime = runtime()?;
    let (url, server) = spawn_canned_server(
        b"HTTP/1.1 200 OK\r\nContent-Length: 5\r\nConnection: close\r\n\r\nhello",
        1,
    )?;
    let factory = HttpExecutorFactory::new(runtime.handle().clone(), REQUEST_TIMEOUT, false);
    let mut executor = factory
        .build()
        .map_err(|failure| AppError::validation(failure.message))?;

    let outcome = executor.perform(&single_target(&url)?);
    drop(server.join());

    match outcome {
        Outcome::Success {
            status: 200,
            bytes: 5,
        } => Ok(()),
        other => Err(AppError::validation(format!(
            "Unexpected outcome: {:?}",
            other
        ))),
    }
}

#[test]
fn http_executor_reports_non_success_status() -> AppResult<()> {
    let runtime = runtime()?;
    let (url, server) = spawn_canned_server(
        b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        1,
    )?;
    let factory = HttpExecutorFactory::new(runtime.handle().clone(), REQUEST_TIMEOUT, true);
    let mut executor = factory
        .build()
        .map_err(|failure| AppError::validation(failure.message))?;

    let outcome = executor.perform(&single_target(&url)?);
    drop(server.join());

    match outcome {
        Outcome::Success {
            status: 404,
            bytes: 0,
        } => Ok(()),
        other => Err(AppError::validation(format!(
            "Unexpected outcome: {:?}",
            other
        ))),
    }
}

#[test]
fn invalid_url_is_fatal() -> AppResult<()> {
    let runtime = runtime()?;
    let factory = HttpExecutorFactory::new(runtime.handle().clone(), REQUEST_TIMEOUT, false);
    let mut executor = factory
        .build()
        .map_err(|failure| AppError::validation(failure.message))?;

    match executor.perform(&single_target("http//missing-colon")?) {
        Outcome::Failure(RequestFailure {
            kind: FailureKind::Fatal,
            ..
        }) => Ok(()),
        other => Err(AppError::validation(format!(
            "Unexpected outcome: {:?}",
            other
        ))),
    }
}

#[test]
fn refused_connection_is_recoverable() -> AppResult<()> {
    let runtime = runtime()?;
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        listener.local_addr()?
    };
    let factory = HttpExecutorFactory::new(runtime.handle().clone(), REQUEST_TIMEOUT, false);
    let mut executor = factory
        .build()
        .map_err(|failure| AppError::validation(failure.message))?;

    match executor.perform(&single_target(&format!("http://{}/", addr))?) {
        Outcome::Failure(RequestFailure {
            kind: FailureKind::Recoverable,
            ..
        }) => Ok(()),
        other => Err(AppError::validation(format!(
            "Unexpected outcome: {:?}",
            other
        ))),
    }
}

#[test]
fn unresolvable_host_is_fatal() -> AppResult<()> {
    let runtime = runtime()?;
    let factory = HttpExecutorFactory::new(runtime.handle().clone(), REQUEST_TIMEOUT, false);
    let mut executor = factory
        .build()
        .map_err(|failure| AppError::validation(failure.message))?;

    match executor.perform(&single_target("http://rrbench-missing-host.invalid/")?) {
        Outcome::Failure(RequestFailure {
            kind: FailureKind::Fatal,
            ..
        }) => Ok(()),
        other => Err(AppError::validation(format!(
            "Unexpected outcome: {:?}",
            other
        ))),
    }
}

#[test]
fn failure_constructors_set_kind() -> AppResult<()> {
    if RequestFailure::fatal("x").kind != FailureKind::Fatal {
        return Err(AppError::validation("Expected fatal kind"));
    }
    if RequestFailure::recoverable("x").kind != FailureKind::Recoverable {
        return Err(AppError::validation("Expected recoverable kind"));
    }
    Ok(())
}

#[test]
fn http_executor_speaks_http1() -> AppResult<()> {
    let runtime = runtime()?;
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    let (line_tx, line_rx) = std::sync::mpsc::channel::<String>();
    let server = std::thread::spawn(move || {
        let Ok((mut stream, _)) = listener.accept() else {
            return;
        };
        let mut buffer = [0u8; 1024];
        let Ok(read) = stream.read(&mut buffer) else {
            return;
        };
        let request = String::from_utf8_lossy(buffer.get(..read).unwrap_or_default());
        drop(line_tx.send(request.lines().next().unwrap_or_default().to_owned()));
        drop(stream.write_all(b"HTTP/1.1 204 No Content\r\nConnection: close\r\n\r\n"));
        drop(stream.shutdown(Shutdown::Both));
    });

    let factory = HttpExecutorFactory::new(runtime.handle().clone(), REQUEST_TIMEOUT, true);
    let mut executor = factory
        .build()
        .map_err(|failure| AppError::validation(failure.message))?;
    let outcome = executor.perform(&single_target(&format!("http://{}/", addr))?);
    drop(server.join());

    let request_line = line_rx
        .recv_timeout(REQUEST_TIMEOUT)
        .map_err(|err| AppError::validation(format!("No request seen: {}", err)))?;
    if request_line != "GET / HTTP/1.1" {
        return Err(AppError::validation(format!(
            "Unexpected request line: {}",
            request_line
        )));
    }
    match outcome {
        Outcome::Success { status: 204, .. } => Ok(()),
        other => Err(AppError::validation(format!(
            "Unexpected outcome: {:?}",
            other
        ))),
    }
}
