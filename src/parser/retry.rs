use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, warn};

use crate::core::ScanError;

/// Where the retry loop waits between attempts.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_BASE_DELAY_MS: u64 = 2000;

/// Bounded exponential backoff: `base * 2^n` before retry `n`, no jitter.
#[derive(Clone)]
pub struct RetryStrategy {
    max_retries: u32,
    base_delay_ms: u64,
    max_delay_ms: u64,
    sleeper: Arc<dyn Sleeper>,
}

impl Default for RetryStrategy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RETRIES)
    }
}

impl RetryStrategy {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            base_delay_ms: DEFAULT_BASE_DELAY_MS,
            max_delay_ms: 60000,
            sleeper: Arc::new(TokioSleeper),
        }
    }

    pub fn with_base_delay_ms(mut self, base_delay_ms: u64) -> Self {
        self.base_delay_ms = base_delay_ms;
        self
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Run `operation` until it succeeds, fails fatally, or the retry budget
    /// is spent. The last error is returned untouched.
    pub async fn retry_with_backoff<F, Fut, T>(&self, mut operation: F) -> Result<T, ScanError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, ScanError>>,
    {
        let mut retries = 0;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    if !e.is_retryable() {
                        error!("Attempt {} failed with a fatal error: {}", retries + 1, e);
                        return Err(e);
                    }

                    if retries >= self.max_retries {
                        error!(
                            "Attempt {} failed: {}. Retry budget of {} exhausted",
                            retries + 1,
                            e,
                            self.max_retries
                        );
                        return Err(e);
                    }

                    let delay = self.calculate_backoff(retries);
                    warn!(
                        "Attempt {}/{} failed: {}. Retrying in {}s...",
                        retries + 1,
                        self.max_retries + 1,
                        e,
                        delay.as_secs()
                    );
                    self.sleeper.sleep(delay).await;
                    retries += 1;
                }
            }
        }
    }

    fn calculate_backoff(&self, retry: u32) -> Duration {
        let delay_ms = self.base_delay_ms.saturating_mul(2_u64.saturating_pow(retry));
        Duration::from_millis(delay_ms.min(self.max_delay_ms))
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::sync::Mutex;

    /// Records requested waits instead of sleeping.
    #[derive(Default)]
    pub struct RecordingSleeper {
        pub waits: Mutex<Vec<Duration>>,
    }

    impl RecordingSleeper {
        pub fn waits(&self) -> Vec<Duration> {
            self.waits.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Sleeper for RecordingSleeper {
        async fn sleep(&self, duration: Duration) {
            self.waits.lock().unwrap().push(duration);
        }
    }
}
