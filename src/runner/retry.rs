use crate::config::RetryConfig;
use crate::error::ProviderError;
use crate::provider::{Agent, AgentResponse};
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::warn;

/// Execute an async operation with exponential backoff.
///
/// The first retry waits `backoff_base_ms`, each later one twice the previous delay,
/// plus up to `jitter_ms` of random jitter. No delay follows the last attempt.
pub async fn retry_with_backoff<F, Fut, T, E>(
    config: &RetryConfig,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempts = 0;
    let mut backoff_ms = config.backoff_base_ms;

    loop {
        attempts += 1;

        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) if attempts >= max_attempts => {
                warn!("Attempt {} failed: {}. Giving up.", attempts, e);
                return Err(e);
            }
            Err(e) => {
                let jitter = if config.jitter_ms > 0 {
                    rand::random::<u64>() % config.jitter_ms
                } else {
                    0
                };
                let delay = Duration::from_millis(backoff_ms.saturating_add(jitter));

                warn!(
                    "Attempt {} failed: {}. Retrying in {:?}...",
                    attempts, e, delay
                );

                sleep(delay).await;
                backoff_ms = backoff_ms.saturating_mul(2);
            }
        }
    }
}

/// Run one agent task with retries.
///
/// Returns `None` once every attempt has failed; each attempt is bounded by
/// `attempt_timeout` when one is given.
pub async fn invoke_with_retries(
    agent: &dyn Agent,
    task: &str,
    config: &RetryConfig,
    attempt_timeout: Option<Duration>,
) -> Option<AgentResponse> {
    let result = retry_with_backoff(config, move || async move {
        match attempt_timeout {
            Some(limit) => match timeout(limit, agent.run(task)).await {
                Ok(outcome) => outcome,
                Err(_) => Err(ProviderError::Timeout(limit)),
            },
            None => agent.run(task).await,
        }
    })
    .await;

    match result {
        Ok(response) => Some(response),
        Err(e) => {
            warn!(
                "{} failed after {} attempts: {}",
                agent.name(),
                config.max_attempts.max(1),
                e
            );
            None
        }
    }
}
