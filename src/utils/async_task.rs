use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tokio::time::timeout;
use tracing::debug;
use tracing::warn;

use crate::BackoffPolicy;
use crate::Error;
use crate::Result;

/// Runs `task` until it succeeds, at most `policy.max_retries` times.
///
/// Every attempt is bounded by `policy.timeout_ms`; between attempts the delay
/// starts at `policy.base_delay_ms` and doubles up to `policy.max_delay_ms`.
/// On exhaustion the error of the last attempt is returned.
pub(crate) async fn task_with_timeout_and_exponential_backoff<F, T, P>(
    mut task: F,
    policy: BackoffPolicy,
) -> Result<P>
where
    F: FnMut() -> T,
    T: Future<Output = Result<P>>,
{
    let timeout_duration = Duration::from_millis(policy.timeout_ms);
    let max_delay = Duration::from_millis(policy.max_delay_ms);
    let mut current_delay = Duration::from_millis(policy.base_delay_ms);

    let mut last_error = Error::RetryTaskFailed("Task failed after max retries".to_string());
    for attempt in 1..=policy.max_retries {
        debug!("Attempt {} of {}", attempt, policy.max_retries);
        match timeout(timeout_duration, task()).await {
            Ok(Ok(r)) => return Ok(r),
            Ok(Err(e)) => {
                debug!("attempt {} failed: {}", attempt, e);
                last_error = e;
            }
            Err(_) => {
                debug!("attempt {} timed out after {:?}", attempt, timeout_duration);
                last_error = Error::RetryTimeoutError;
            }
        }

        if attempt < policy.max_retries {
            sleep(current_delay).await;
            current_delay = (current_delay * 2).min(max_delay);
        }
    }

    warn!("Task failed after {} retries", policy.max_retries);
    Err(last_error)
}
