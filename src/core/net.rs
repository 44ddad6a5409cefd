// src/core/net.rs
// Blocking HTTP GET with timeout, linear backoff and a TLS-verification toggle.

use std::{thread, time::Duration};

use reqwest::blocking::Client;
use tracing::{debug, error, warn};

use crate::config::NetOptions;
use crate::config::consts::{RETRYABLE_STATUS, USER_AGENT};

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("{url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url}: HTTP {status}")]
    Status { url: String, status: u16 },
}

impl FetchError {
    /// Transport failures and throttling/5xx statuses get another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Transport { .. } => true,
            FetchError::Status { status, .. } => RETRYABLE_STATUS.contains(status),
            FetchError::Client(_) => false,
        }
    }
}

/// "Fetch or fail" for one URL. Implementations do their own retrying;
/// callers treat `Err` as "skip this URL".
pub trait Fetch: Send + Sync {
    fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Delay before retry number `attempt` (1-based): `base * attempt`.
/// Saturates at `Duration::MAX`; negative or NaN bases mean no wait.
pub fn backoff_delay(base_secs: f64, attempt: u32) -> Duration {
    let secs = base_secs * f64::from(attempt);
    if secs.is_nan() || secs <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}

/// Run `attempt_once` up to `max_attempts` times (at least once), calling
/// `sleep` with the backoff delay between retryable failures. The last error
/// is returned once attempts run out; a non-retryable one is returned at once.
pub fn with_retries(
    url: &str,
    max_attempts: u32,
    backoff_secs: f64,
    mut attempt_once: impl FnMut() -> Result<String, FetchError>,
    mut sleep: impl FnMut(Duration),
) -> Result<String, FetchError> {
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match attempt_once() {
            Ok(body) => {
                debug!(url, attempt, bytes = body.len(), "fetched");
                return Ok(body);
            }
            Err(e) if e.is_retryable() && attempt < max_attempts => {
                let delay = backoff_delay(backoff_secs, attempt);
                warn!(url, attempt, ?delay, "fetch failed, retrying: {e}");
                sleep(delay); // only this worker waits
                attempt += 1;
            }
            Err(e) => {
                error!(url, attempt, "fetch failed: {e}");
                return Err(e);
            }
        }
    }
}

pub struct HttpClient {
    client: Client,
    max_attempts: u32,
    backoff_secs: f64,
}

impl HttpClient {
    /// `pool_size` should be at least the worker count so concurrent fetches
    /// don't queue on idle connections.
    pub fn new(net: &NetOptions, pool_size: usize) -> Result<Self, FetchError> {
        if !net.verify_ssl {
            warn!("TLS certificate verification is disabled");
        }
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(net.timeout())
            .danger_accept_invalid_certs(!net.verify_ssl)
            .pool_max_idle_per_host(pool_size.max(1))
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client,
            max_attempts: net.max_retries.max(1),
            backoff_secs: net.backoff_secs,
        })
    }

    fn get_once(&self, url: &str) -> Result<String, FetchError> {
        let transport = |source| FetchError::Transport { url: s!(url), source };

        let resp = self.client.get(url).send().map_err(transport)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status { url: s!(url), status: status.as_u16() });
        }
        resp.text().map_err(transport)
    }
}

impl Fetch for HttpClient {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        with_retries(url, self.max_attempts, self.backoff_secs, || self.get_once(url), thread::sleep)
    }
}
