use std::error::Error as _;
use std::time::Duration;

use reqwest::Client;
use tokio::runtime::Handle;
use url::Url;

use super::{ExecutorFactory, Outcome, RequestExecutor, RequestFailure};
use crate::targets::Target;

pub const DEFAULT_USER_AGENT: &str = concat!("rrbench/", env!("CARGO_PKG_VERSION"));

/// Builds one [`HttpExecutor`] per worker on top of the shared tokio runtime.
#[derive(Debug, Clone)]
pub struct HttpExecutorFactory {
    runtime: Handle,
    timeout: Duration,
    keep_alive: bool,
}

impl HttpExecutorFactory {
    #[must_use]
    pub const fn new(runtime: Handle, timeout: Duration, keep_alive: bool) -> Self {
        Self {
            runtime,
            timeout,
            keep_alive,
        }
    }
}

impl ExecutorFactory for HttpExecutorFactory {
    type Executor = HttpExecutor;

    fn build(&self) -> Result<HttpExecutor, RequestFailure> {
        let mut builder = Client::builder()
            .http1_only()
            .timeout(self.timeout)
            .user_agent(DEFAULT_USER_AGENT);

        if !self.keep_alive {
            builder = builder
                .pool_max_idle_per_host(0)
                .pool_idle_timeout(Some(Duration::from_secs(0)));
        }

        let client = builder.build().map_err(|err| {
            RequestFailure::fatal(format!("Failed to build HTTP client: {}", err))
        })?;

        Ok(HttpExecutor {
            client,
            runtime: self.runtime.clone(),
        })
    }
}

/// Blocking facade over an async `reqwest` client.
///
/// Must be driven from a plain OS thread: the request future runs on the
/// runtime behind `runtime` via [`Handle::block_on`].
#[derive(Debug)]
pub struct HttpExecutor {
    client: Client,
    runtime: Handle,
}

impl RequestExecutor for HttpExecutor {
    fn perform(&mut self, target: &Target) -> Outcome {
        let url = match Url::parse(target.as_str()) {
            Ok(url) => url,
            Err(err) => {
                return Outcome::Failure(RequestFailure::fatal(format!(
                    "Invalid URL '{}': {}",
                    target, err
                )));
            }
        };
        self.runtime.block_on(fetch(&self.client, url))
    }
}

async fn fetch(client: &Client, url: Url) -> Outcome {
    let mut response = match client.get(url).send().await {
        Ok(response) => response,
        Err(err) => return Outcome::Failure(classify_error(&err)),
    };
    let status = response.status().as_u16();

    let mut bytes: u64 = 0;
    loop {
        match response.chunk().await {
            Ok(Some(chunk)) => {
                bytes = bytes.saturating_add(u64::try_from(chunk.len()).unwrap_or(u64::MAX));
            }
            Ok(None) => break,
            Err(err) => return Outcome::Failure(classify_error(&err)),
        }
    }

    Outcome::Success { status, bytes }
}

/// Unresolvable hosts and malformed requests end the run; anything else is
/// worth retrying on the next iteration.
fn classify_error(err: &reqwest::Error) -> RequestFailure {
    if err.is_builder() || is_resolution_failure(err) {
        RequestFailure::fatal(describe(err))
    } else {
        RequestFailure::recoverable(describe(err))
    }
}

fn is_resolution_failure(err: &reqwest::Error) -> bool {
    if !err.is_connect() {
        return false;
    }
    // hyper-util's `HttpConnector` reports resolver failures as a
    // `ConnectError` whose message is "dns error"; no typed variant is exposed.
    let mut source = err.source();
    while let Some(inner) = source {
        if inner.to_string().starts_with("dns error") {
            return true;
        }
        source = inner.source();
    }
    false
}

fn describe(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message
}
