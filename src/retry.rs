use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::backend::BackendError;
use crate::observability;

/// Bounded exponential backoff for transient collaborator failures.
/// Attempt n sleeps `base_delay * 2^n` before trying again.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// No retries, no sleeping. For tests and latency-sensitive callers.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
        }
    }

    fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt)
    }
}

/// Run `op`, retrying on transient errors only. Validation, conflict, and
/// not-found failures surface immediately.
pub async fn with_retry<T, F, Fut>(policy: RetryPolicy, mut op: F) -> Result<T, BackendError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, BackendError>>,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() && attempt + 1 < policy.max_attempts => {
                let delay = policy.delay_for(attempt);
                attempt += 1;
                metrics::counter!(observability::RETRY_ATTEMPTS_TOTAL).increment(1);
                warn!("transient backend failure (attempt {attempt}), retrying in {delay:?}: {e}");
                tokio::time::sleep(delay).await;
            }
            Err(e) => {
                if e.is_transient() {
                    metrics::counter!(observability::RETRY_EXHAUSTED_TOTAL).increment(1);
                }
                return Err(e);
            }
        }
    }
}
