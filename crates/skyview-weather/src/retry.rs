//! Bounded retry for idempotent GET requests.
//!
//! Retries connection failures, timeouts, 5xx, 408 and 429. Everything else
//! is returned to the caller on the first attempt.

use std::future::Future;
use std::time::Duration;

use reqwest::{Response, StatusCode};

#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total attempts including the first. Zero is treated as one.
    pub max_attempts: u32,
    /// Delay before the second attempt (doubles each attempt)
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl RetryConfig {
    pub fn new(max_attempts: u32, initial_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts,
            initial_delay,
            max_delay,
        }
    }

    /// Delay after the given failed attempt (0-based)
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.initial_delay
            .saturating_mul(factor)
            .min(self.max_delay)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    Retry,
    NoRetry,
}

pub fn is_retryable_error(error: &reqwest::Error) -> RetryDecision {
    if error.is_timeout() || error.is_connect() {
        return RetryDecision::Retry;
    }
    match error.status() {
        Some(status) => is_retryable_status(status),
        None => RetryDecision::NoRetry,
    }
}

pub fn is_retryable_status(status: StatusCode) -> RetryDecision {
    if status.is_server_error()
        || status == StatusCode::TOO_MANY_REQUESTS
        || status == StatusCode::REQUEST_TIMEOUT
    {
        RetryDecision::Retry
    } else {
        RetryDecision::NoRetry
    }
}

/// Run `operation` until it yields a non-retryable outcome or attempts run
/// out. A retryable status on the final attempt is returned as the response.
pub async fn with_retry<F, Fut>(
    config: &RetryConfig,
    operation: F,
) -> Result<Response, reqwest::Error>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<Response, reqwest::Error>>,
{
    let attempts = config.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        let outcome = operation().await;
        let is_last = attempt + 1 >= attempts;

        let retry = match &outcome {
            Ok(response) => is_retryable_status(response.status()) == RetryDecision::Retry,
            Err(e) => is_retryable_error(e) == RetryDecision::Retry,
        };

        if !retry || is_last {
            if retry {
                tracing::warn!("All {} attempts exhausted", attempts);
            } else if attempt > 0 && outcome.is_ok() {
                tracing::debug!("Request completed after {} retries", attempt);
            }
            return outcome;
        }

        match &outcome {
            Ok(response) => tracing::warn!(
                "Retryable status {} on attempt {} of {}",
                response.status(),
                attempt + 1,
                attempts
            ),
            Err(e) => tracing::warn!(
                "Retryable error on attempt {} of {}: {}",
                attempt + 1,
                attempts,
                e
            ),
        }

        tokio::time::sleep(config.delay_for_attempt(attempt)).await;
        attempt += 1;
    }
}
