use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::ports::spreadsheet::SpreadsheetServiceError;

/// Fixed-backoff retry policy for rate-limited requests. The backoff is not
/// adaptive; a run that keeps hitting the quota simply waits out
/// `max_retries` sleeps and then propagates the rate-limit error.
#[derive(Clone, Copy, Debug)]
pub struct RetryPolicy {
    pub backoff: Duration,
    pub max_retries: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            backoff: Duration::from_secs(100),
            max_retries: 10,
        }
    }
}

/// Executes one remote operation, retrying it on the rate-limit signal and
/// propagating every other outcome unchanged.
pub async fn execute_with_quota_retry<T, F, Fut>(
    policy: RetryPolicy,
    operation: F,
) -> error_stack::Result<T, SpreadsheetServiceError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = error_stack::Result<T, SpreadsheetServiceError>>,
{
    let mut retries = 0;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(report)
                if matches!(
                    report.current_context(),
                    SpreadsheetServiceError::RateLimited
                ) && retries < policy.max_retries =>
            {
                retries += 1;
                warn!(
                    retries,
                    max_retries = policy.max_retries,
                    backoff_secs = policy.backoff.as_secs(),
                    "Request quota exceeded, backing off before retrying"
                );
                tokio::time::sleep(policy.backoff).await;
            }
            Err(report) => return Err(report),
        }
    }
}
