use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

use crate::Result;

/// Backoff settings for startup-time operations such as the first database
/// connection. Request paths never retry.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub backoff_multiplier: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay_ms: 500,
            max_delay_ms: 8000,
            backoff_multiplier: 2,
        }
    }
}

impl RetryConfig {
    /// Delay before attempt `attempt + 1`, 1-based.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = u64::from(self.backoff_multiplier).saturating_pow(attempt.saturating_sub(1));
        let delay = self.initial_delay_ms.saturating_mul(factor);
        Duration::from_millis(delay.min(self.max_delay_ms))
    }
}

/// Run `operation` until it succeeds or `max_attempts` is exhausted,
/// returning the last error.
pub async fn retry_with_backoff<F, Fut, T>(label: &str, config: RetryConfig, operation: F) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        tracing::debug!("🔄 RETRY: {} attempt {}/{}", label, attempt, max_attempts);

        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    tracing::info!("✅ RETRY: {} succeeded on attempt {}", label, attempt);
                }
                return Ok(value);
            }
            Err(e) if attempt < max_attempts => {
                let delay = config.delay_after(attempt);
                tracing::warn!(
                    "⚠️ RETRY: {} attempt {} failed: {}, retrying in {:?}",
                    label, attempt, e, delay
                );
                sleep(delay).await;
                attempt += 1;
            }
            Err(e) => {
                tracing::error!("❌ RETRY: {} failed after {} attempts: {}", label, attempt, e);
                return Err(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AppError;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast() -> RetryConfig {
        RetryConfig {
            max_attempts: 3,
            initial_delay_ms: 1,
            max_delay_ms: 2,
            backoff_multiplier: 2,
        }
    }

    #[test]
    fn test_delay_grows_and_caps() {
        let config = RetryConfig::default();
        assert_eq!(config.delay_after(1), Duration::from_millis(500));
        assert_eq!(config.delay_after(2), Duration::from_millis(1000));
        assert_eq!(config.delay_after(3), Duration::from_millis(2000));
        assert_eq!(config.delay_after(10), Duration::from_millis(8000));
    }

    #[tokio::test]
    async fn test_succeeds_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let result = retry_with_backoff("flaky", fast(), || async {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(AppError::DatabaseError("not yet".to_string()))
            } else {
                Ok(42)
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_returns_last_error_when_exhausted() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = retry_with_backoff("down", fast(), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(AppError::DatabaseError("still down".to_string()))
        })
        .await;

        assert!(matches!(result, Err(AppError::DatabaseError(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
