//! Fixed-delay retry for the live data request.
//!
//! Retried:
//! - timeouts and connection failures
//! - 5xx, 408 and 429 responses
//!
//! Everything else (4xx, malformed requests) is returned on the first attempt.

use std::future::Future;
use std::time::Duration;

use reqwest::{Response, StatusCode};

/// Retry configuration
#[derive(Debug, Clone, Default)]
pub struct RetryConfig {
    /// Extra attempts after the first one
    pub max_retries: u32,
    /// Pause before each retry
    pub delay: Duration,
}

impl RetryConfig {
    pub fn new(max_retries: u32, delay_ms: u64) -> Self {
        Self {
            max_retries,
            delay: Duration::from_millis(delay_ms),
        }
    }
}

/// Error classification for retry decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    Retry,
    NoRetry,
}

/// Check if a reqwest error is retryable
pub fn is_retryable_error(error: &reqwest::Error) -> RetryDecision {
    if error.is_timeout() {
        tracing::debug!("Request timed out, will retry");
        return RetryDecision::Retry;
    }

    if error.is_connect() {
        tracing::debug!("Connection error, will retry");
        return RetryDecision::Retry;
    }

    RetryDecision::NoRetry
}

/// Check if a status code is retryable
pub fn is_retryable_status(status: StatusCode) -> RetryDecision {
    if status.is_server_error()
        || status == StatusCode::TOO_MANY_REQUESTS
        || status == StatusCode::REQUEST_TIMEOUT
    {
        tracing::debug!("Status {} is retryable", status);
        return RetryDecision::Retry;
    }

    RetryDecision::NoRetry
}

/// Execute an HTTP request with retry logic.
///
/// Returns the first non-retryable outcome, or the last outcome once
/// `max_retries` extra attempts are spent. A retryable status on the final
/// attempt is returned as the response so the caller can inspect it.
///
/// # Errors
/// Returns the transport error of the last attempt.
pub async fn with_retry<F, Fut>(config: &RetryConfig, operation: F) -> Result<Response, reqwest::Error>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<Response, reqwest::Error>>,
{
    let mut attempt = 0;

    loop {
        let outcome = operation().await;
        let exhausted = attempt >= config.max_retries;

        let decision = match &outcome {
            Ok(response) => is_retryable_status(response.status()),
            Err(e) => is_retryable_error(e),
        };

        if decision == RetryDecision::NoRetry || exhausted {
            if exhausted && decision == RetryDecision::Retry && config.max_retries > 0 {
                tracing::error!("All {} attempts exhausted", config.max_retries + 1);
            } else if attempt > 0 && outcome.is_ok() {
                tracing::info!("Request completed after {} retries", attempt);
            }
            return outcome;
        }

        match &outcome {
            Ok(response) => tracing::warn!(
                "Retryable status {} on attempt {} of {}",
                response.status(),
                attempt + 1,
                config.max_retries + 1
            ),
            Err(e) => tracing::warn!(
                "Retryable error on attempt {} of {}: {}",
                attempt + 1,
                config.max_retries + 1,
                e
            ),
        }

        tokio::time::sleep(config.delay).await;
        attempt += 1;
    }
}
