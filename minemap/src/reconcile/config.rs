//! Reconciler runtime configuration.

use std::time::Duration;

/// Default bound on a single geometry fetch.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Default number of retries after a transient fetch failure.
pub const DEFAULT_FETCH_RETRIES: u32 = 0;

/// Default delay before the first retry. Doubles on each further retry.
pub const DEFAULT_RETRY_BASE_DELAY: Duration = Duration::from_millis(500);

/// Upper bound on the delay between retries.
pub const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

/// Configuration for the [`Reconciler`](super::Reconciler).
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use minemap::reconcile::ReconcilerConfig;
///
/// let config = ReconcilerConfig::default();
/// assert_eq!(config.fetch_timeout(), Duration::from_secs(30));
/// assert_eq!(config.fetch_retries(), 0);
///
/// let config = ReconcilerConfig::new()
///     .with_fetch_timeout(Duration::from_secs(10))
///     .with_fetch_retries(2);
/// assert_eq!(config.fetch_retries(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcilerConfig {
    fetch_timeout: Duration,
    fetch_retries: u32,
    retry_base_delay: Duration,
}

impl ReconcilerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound on each fetch attempt. A fetch exceeding it fails with
    /// `FetchError::Timeout`.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Retries after a transport failure or timeout. Malformed payloads and
    /// missing geometry are never retried.
    pub fn with_fetch_retries(mut self, retries: u32) -> Self {
        self.fetch_retries = retries;
        self
    }

    pub fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    pub fn fetch_timeout(&self) -> Duration {
        self.fetch_timeout
    }

    pub fn fetch_retries(&self) -> u32 {
        self.fetch_retries
    }

    pub fn retry_base_delay(&self) -> Duration {
        self.retry_base_delay
    }

    /// Delay before retry number `attempt` (0-based): `base * 2^attempt`,
    /// capped at [`MAX_RETRY_DELAY`].
    pub fn retry_delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.min(16));
        self.retry_base_delay
            .saturating_mul(factor)
            .min(MAX_RETRY_DELAY)
    }
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            fetch_retries: DEFAULT_FETCH_RETRIES,
            retry_base_delay: DEFAULT_RETRY_BASE_DELAY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ReconcilerConfig::default();
        assert_eq!(config.fetch_timeout(), DEFAULT_FETCH_TIMEOUT);
        assert_eq!(config.fetch_retries(), 0);
        assert_eq!(config, ReconcilerConfig::new());
    }

    #[test]
    fn test_builder_chain() {
        let config = ReconcilerConfig::new()
            .with_fetch_timeout(Duration::from_secs(5))
            .with_fetch_retries(3)
            .with_retry_base_delay(Duration::from_secs(1));
        assert_eq!(config.fetch_timeout(), Duration::from_secs(5));
        assert_eq!(config.fetch_retries(), 3);
        assert_eq!(config.retry_base_delay(), Duration::from_secs(1));
    }

    #[test]
    fn test_retry_delay_backoff() {
        let config = ReconcilerConfig::new().with_retry_base_delay(Duration::from_secs(1));
        assert_eq!(config.retry_delay(0), Duration::from_secs(1));
        assert_eq!(config.retry_delay(1), Duration::from_secs(2));
        assert_eq!(config.retry_delay(3), Duration::from_secs(8));
        assert_eq!(config.retry_delay(10), MAX_RETRY_DELAY);
        assert_eq!(config.retry_delay(u32::MAX), MAX_RETRY_DELAY);
    }
}
