//! Exponential backoff for `submit_task_result` (spec.md §4.1).

use std::future::Future;

use tracing::warn;
use uw_core::WorkerResult;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub base_delay_ms: u64,
    pub max_attempts: u32,
}

impl RetryPolicy {
    pub fn new(base_delay_ms: u64, max_attempts: u32) -> Self {
        Self { base_delay_ms, max_attempts }
    }

    /// Retries `op` with a doubling delay until it succeeds or
    /// `max_attempts` is exhausted, returning the last error.
    pub async fn run<F, Fut>(&self, mut op: F) -> WorkerResult<()>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = WorkerResult<()>>,
    {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match op().await {
                Ok(()) => return Ok(()),
                Err(e) if attempt >= self.max_attempts => return Err(e),
                Err(e) => {
                    let delay_ms = self.base_delay_ms * 2u64.pow(attempt - 1);
                    warn!(attempt, delay_ms, error = %e, "submit_task_result failed, retrying");
                    tokio::time::sleep(std::time::Duration::from_millis(delay_ms)).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use uw_core::WorkerError;

    #[tokio::test]
    async fn succeeds_without_retry_when_first_attempt_works() {
        let policy = RetryPolicy::new(1, 5);
        let calls = AtomicU32::new(0);
        let result = policy
            .run(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(()) }
            })
            .await;
        assert!(result.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_until_success() {
        let policy = RetryPolicy::new(1, 5);
        let calls = AtomicU32::new(0);
        let result = policy
            .run(|| {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err(WorkerError::Transport("connection reset".to_string()))
                    } else {
                        Ok(())
                    }
                }
            })
            .await;
        assert!(result.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let policy = RetryPolicy::new(1, 3);
        let calls = AtomicU32::new(0);
        let result = policy
            .run(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(WorkerError::Transport("down".to_string())) }
            })
            .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
