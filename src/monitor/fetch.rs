//! HTTP fetching with retry and exponential backoff.
//!
//! Every outbound GET in this crate goes through [`Fetcher`]: bounded
//! timeout, doubling backoff between attempts, and a typed split between
//! retryable and terminal failures so payload-level errors stop retrying
//! immediately.

use std::future::Future;
use std::time::Duration;

use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio_retry::strategy::ExponentialBackoff;
use tokio_retry::RetryIf;
use tracing::warn;

/// Per-request timeout applied to every outbound call.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Failure modes of an outbound fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure (connect, timeout, TLS).
    #[error("transport error: {0}")]
    Transport(String),
    /// Non-2xx HTTP status.
    #[error("unexpected http status {0}")]
    Status(u16),
    /// The API payload signalled a rate-limit condition.
    #[error("rate limited: {0}")]
    RateLimited(String),
    /// The API payload signalled a non-retryable error.
    #[error("api error: {0}")]
    Api(String),
    /// Body could not be parsed as the expected shape.
    #[error("invalid response body: {0}")]
    InvalidBody(String),
}

impl FetchError {
    /// Transient failures are retried; payload-level errors are not.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FetchError::Transport(_) | FetchError::Status(_) | FetchError::RateLimited(_)
        )
    }
}

/// Attempt ceiling and backoff base for one class of outbound calls.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: usize,
    /// Delay before the second attempt; doubles on each further attempt
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(300),
        }
    }
}

impl RetryPolicy {
    /// Doubling backoff capped at 5s, yielding `max_attempts - 1` delays.
    fn backoff(&self) -> impl Iterator<Item = Duration> {
        // base 2 with the initial delay as factor gives exact doubling
        ExponentialBackoff::from_millis(2)
            .factor((self.initial_delay.as_millis() as u64 / 2).max(1))
            .max_delay(Duration::from_secs(5))
            .take(self.max_attempts.saturating_sub(1))
    }
}

/// Run `op` up to `policy.max_attempts` times, sleeping the doubling backoff
/// between attempts. Terminal errors short-circuit on first occurrence.
pub async fn with_retries<T, F, Fut>(policy: &RetryPolicy, op: F) -> Result<T, FetchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    RetryIf::spawn(policy.backoff(), op, FetchError::is_retryable).await
}

/// Log a degraded fetch and substitute the documented fallback value.
///
/// Kept as a single choke point so a "zero because the feed was down" is
/// always distinguishable from a real zero in the logs.
pub fn fallback_value<T: Default>(source: &str, err: &FetchError) -> T {
    fallback_with(source, err, T::default())
}

/// Same as [`fallback_value`] for fallbacks that are not `Default::default()`.
pub fn fallback_with<T>(source: &str, err: &FetchError, value: T) -> T {
    warn!(source, error = %err, "fetch failed, substituting fallback value");
    value
}

/// Thin wrapper around a shared [`reqwest::Client`] applying the retry policy
/// and per-request timeout to every GET.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    policy: RetryPolicy,
}

impl Fetcher {
    /// Create a fetcher with the default policy (3 attempts, 300ms base).
    pub fn new(client: reqwest::Client) -> Self {
        Self::with_policy(client, RetryPolicy::default())
    }

    /// Create a fetcher with an explicit retry policy.
    pub fn with_policy(client: reqwest::Client, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    /// The retry policy in force, for callers that drive their own loops.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// GET `url` and parse the body as untyped JSON.
    pub async fn get_json(&self, url: &str) -> Result<serde_json::Value, FetchError> {
        self.get_typed(url).await
    }

    /// GET `url` and parse the body as `T`.
    pub async fn get_typed<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        with_retries(&self.policy, || self.get_typed_once(url)).await
    }

    /// GET `url` and return the raw body text (plaintext endpoints).
    pub async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        with_retries(&self.policy, || self.get_text_once(url)).await
    }

    /// One typed-JSON attempt, no retries. For callers that need to inspect
    /// the payload before deciding whether an attempt counts as failed.
    pub(crate) async fn get_typed_once<T: DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<T, FetchError> {
        let response = self.send(url).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| FetchError::InvalidBody(e.to_string()))
    }

    /// One plaintext attempt, no retries.
    async fn get_text_once(&self, url: &str) -> Result<String, FetchError> {
        let response = self.send(url).await?;
        response
            .text()
            .await
            .map_err(|e| FetchError::InvalidBody(e.to_string()))
    }

    /// One GET attempt, mapped into [`FetchError`] terms.
    async fn send(&self, url: &str) -> Result<reqwest::Response, FetchError> {
        let response = self
            .client
            .get(url)
            .timeout(HTTP_TIMEOUT)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        Ok(response)
    }
}
