//! Bounded retry with randomized backoff, shared by both page fetchers.

use crate::pacing;
use kost_core::{DelayRange, RetryConfig};
use std::fmt::Display;
use std::future::Future;
use tracing::warn;

/// Why a retried operation gave up.
#[derive(Debug)]
pub enum RetryError<E> {
    /// Every attempt failed with a retryable error
    Exhausted {
        /// Attempts made
        attempts: u32,
        /// Error from the final attempt
        last: E,
    },
    /// An attempt failed with an error the predicate refused to retry
    Fatal(E),
}

/// Retry budget and backoff for one kind of fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Wait before each retry
    pub backoff: DelayRange,
}

impl RetryPolicy {
    /// Create a policy. A zero budget is treated as a single attempt.
    #[must_use]
    pub fn new(max_attempts: u32, backoff: DelayRange) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    /// Run `op` until it succeeds, fails fatally, or the budget is spent.
    ///
    /// `op` receives the 1-based attempt number. Errors for which
    /// `is_retryable` returns false end the loop immediately.
    pub async fn run<T, E, F, Fut, P>(
        &self,
        label: &str,
        mut op: F,
        is_retryable: P,
    ) -> Result<T, RetryError<E>>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: Fn(&E) -> bool,
        E: Display,
    {
        let mut attempt = 1;

        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) if !is_retryable(&e) => return Err(RetryError::Fatal(e)),
                Err(e) if attempt >= self.max_attempts => {
                    warn!(
                        label,
                        attempts = attempt,
                        error = %e,
                        "retry budget exhausted"
                    );
                    return Err(RetryError::Exhausted {
                        attempts: attempt,
                        last: e,
                    });
                }
                Err(e) => {
                    let delay = pacing::random_delay(self.backoff);
                    warn!(
                        label,
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %e,
                        "attempt failed, retrying in {:?}",
                        delay
                    );
                    pacing::pause(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

impl From<RetryConfig> for RetryPolicy {
    fn from(config: RetryConfig) -> Self {
        Self::new(config.max_attempts, config.backoff)
    }
}
