//! Backoff for idempotent gateway reads
//!
//! Only reads go through here. The complete-registration POST is sent once:
//! repeating it could place a partner twice.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// How many times a read is repeated and how long to wait in between
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Extra attempts after the first one
    pub max_retries: u32,

    /// Wait before the first retry; doubles on every further retry
    pub base_delay: Duration,

    /// Upper bound for a single wait
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::with_delays(2, 500, 10_000)
    }
}

impl RetryConfig {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    /// Delays given in milliseconds
    pub fn with_delays(max_retries: u32, base_delay_ms: u64, max_delay_ms: u64) -> Self {
        Self {
            max_retries,
            base_delay: Duration::from_millis(base_delay_ms),
            max_delay: Duration::from_millis(max_delay_ms),
        }
    }

    /// Single attempt
    pub fn none() -> Self {
        Self::new(0)
    }

    /// Wait before retry number `retry` (1-based)
    pub fn delay_before(&self, retry: u32) -> Duration {
        if retry == 0 {
            return Duration::ZERO;
        }
        let factor = 1u32.checked_shl(retry - 1).unwrap_or(u32::MAX);
        self.base_delay
            .checked_mul(factor)
            .map_or(self.max_delay, |d| d.min(self.max_delay))
    }
}

/// Run `operation` until it succeeds, fails with an error `retryable`
/// rejects, or the retries are spent.
pub async fn with_retry_if<T, E, F, Fut, P>(
    config: &RetryConfig,
    operation: F,
    retryable: P,
) -> Result<T, E>
where
    E: Display,
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
{
    let mut retry = 0;

    loop {
        let err = match operation().await {
            Ok(value) => {
                if retry > 0 {
                    tracing::debug!(retries = retry, "Read succeeded after retry");
                }
                return Ok(value);
            }
            Err(e) => e,
        };

        if !retryable(&err) {
            return Err(err);
        }
        if retry >= config.max_retries {
            tracing::warn!(attempts = retry + 1, error = %err, "Giving up on read");
            return Err(err);
        }

        retry += 1;
        let delay = config.delay_before(retry);
        tracing::warn!(
            retry,
            max_retries = config.max_retries,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            error = %err,
            "Read failed, retrying"
        );
        tokio::time::sleep(delay).await;
    }
}
