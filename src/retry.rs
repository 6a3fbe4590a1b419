use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tokio_retry::RetryIf;
use tracing::{error, warn};

use crate::config::ScraperConfig;
use crate::models::ProductRecord;
use crate::scraper::ScrapeAttempt;
use crate::utils::error::AttemptError;

/// Delay before retry `n` (0-based) is `min(base * (n + 1), max)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &ScraperConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay: Duration::from_millis(config.base_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    pub fn delay_for(&self, attempt_index: u32) -> Duration {
        self.base_delay
            .saturating_mul(attempt_index.saturating_add(1))
            .min(self.max_delay)
    }

    /// One delay per permitted retry.
    pub fn schedule(&self) -> std::iter::Take<LinearBackoff> {
        LinearBackoff::new(self.base_delay, self.max_delay).take(self.max_retries as usize)
    }
}

/// Linearly growing, capped delay sequence usable as a `tokio_retry` strategy.
#[derive(Debug, Clone)]
pub struct LinearBackoff {
    base: Duration,
    max: Duration,
    step: u32,
}

impl LinearBackoff {
    pub fn new(base: Duration, max: Duration) -> Self {
        Self { base, max, step: 0 }
    }
}

impl Iterator for LinearBackoff {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        self.step = self.step.saturating_add(1);
        Some(self.base.saturating_mul(self.step).min(self.max))
    }
}

/// Wraps a scrape attempt with bounded retries; always yields a record.
pub struct RetryController<A> {
    attempt: A,
    policy: RetryPolicy,
}

impl<A: ScrapeAttempt> RetryController<A> {
    pub fn new(attempt: A, policy: RetryPolicy) -> Self {
        Self { attempt, policy }
    }

    /// Scrape `url`, retrying retryable failures per the policy.
    ///
    /// When attempts run out, or an error is not retryable, the
    /// terminal-failure record is returned; errors never escape.
    pub async fn scrape_with_retry(&self, url: &str) -> ProductRecord {
        let attempts = AtomicU32::new(0);
        let attempts_ref = &attempts;
        let attempt = &self.attempt;
        let policy = self.policy;

        let outcome = RetryIf::spawn(
            policy.schedule(),
            move || {
                let index = attempts_ref.fetch_add(1, Ordering::SeqCst);
                async move {
                    let result = attempt.attempt(url).await;
                    if let Err(e) = &result {
                        if index < policy.max_retries && e.is_retryable() {
                            warn!(
                                url,
                                attempt = index + 1,
                                max_attempts = policy.max_attempts(),
                                delay_ms = policy.delay_for(index).as_millis() as u64,
                                error = %e,
                                "Scrape attempt failed, retrying after backoff"
                            );
                        }
                    }
                    result
                }
            },
            AttemptError::is_retryable,
        )
        .await;

        match outcome {
            Ok(record) => record,
            Err(e) => {
                error!(
                    url,
                    attempts = attempts.load(Ordering::SeqCst),
                    error = %e,
                    "All scrape attempts failed"
                );
                ProductRecord::terminal_failure(url)
            }
        }
    }
}
