//! Retry policy for collection service requests.

use std::time::Duration;

/// Configuration for retrying transient service failures.
///
/// Covers rate limiting (429), server errors (5xx) and transport errors.
/// The delay doubles after every attempt and is capped at `max_delay`.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use shelf_lib::retry::RetryConfig;
///
/// let config = RetryConfig::default()
///     .max_retries(5)
///     .initial_delay(Duration::from_millis(200));
/// assert_eq!(config.delay_for(2), Duration::from_millis(800));
///
/// let none = RetryConfig::no_retry();
/// assert!(!none.should_retry_status(503, 0));
/// ```
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts.
    pub max_retries: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Upper bound for any single delay.
    pub max_delay: Duration,
    /// Whether to retry on HTTP 429.
    pub retry_on_429: bool,
    /// Whether to retry on HTTP 5xx.
    pub retry_on_5xx: bool,
    /// Whether to retry on transport errors.
    pub retry_on_network: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            retry_on_429: true,
            retry_on_5xx: true,
            retry_on_network: true,
        }
    }
}

impl RetryConfig {
    /// Creates a config with all retries disabled.
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            retry_on_429: false,
            retry_on_5xx: false,
            retry_on_network: false,
            ..Default::default()
        }
    }

    /// Sets the maximum number of retries.
    pub fn max_retries(mut self, n: u32) -> Self {
        self.max_retries = n;
        self
    }

    /// Sets the delay before the first retry.
    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Sets the maximum delay between retries.
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Enables or disables retry on HTTP 429.
    pub fn retry_on_429(mut self, enabled: bool) -> Self {
        self.retry_on_429 = enabled;
        self
    }

    /// Enables or disables retry on HTTP 5xx.
    pub fn retry_on_5xx(mut self, enabled: bool) -> Self {
        self.retry_on_5xx = enabled;
        self
    }

    /// Enables or disables retry on transport errors.
    pub fn retry_on_network(mut self, enabled: bool) -> Self {
        self.retry_on_network = enabled;
        self
    }

    /// Backoff delay before retry number `attempt` (zero-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.initial_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    /// Whether a response with `status` should be retried after `attempts` tries.
    pub fn should_retry_status(&self, status: u16, attempts: u32) -> bool {
        if attempts >= self.max_retries {
            return false;
        }
        match status {
            429 => self.retry_on_429,
            500..=599 => self.retry_on_5xx,
            _ => false,
        }
    }

    /// Whether a transport failure should be retried after `attempts` tries.
    pub fn should_retry_network(&self, attempts: u32) -> bool {
        self.retry_on_network && attempts < self.max_retries
    }
}
