//! Retry with exponential backoff and random jitter.

use anyhow::Result;
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

use crate::config::RecoveryConfig;

/// Delay before retry number `attempt` (1-based): doubles from the base
/// delay, capped at the maximum, plus up to 25% random jitter.
pub fn backoff_delay(config: &RecoveryConfig, attempt: u32) -> Duration {
    let exponent = attempt.saturating_sub(1).min(16);
    let base = config
        .base_retry_delay_ms
        .saturating_mul(1u64 << exponent)
        .min(config.max_retry_delay_ms);
    let jitter = if base >= 4 {
        rand::thread_rng().gen_range(0..=base / 4)
    } else {
        0
    };
    Duration::from_millis(base + jitter)
}

/// Run `operation` until it succeeds or `max_retries` retries are used up
pub async fn with_retry<T, F, Fut>(config: &RecoveryConfig, what: &str, mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < config.max_retries => {
                attempt += 1;
                let delay = backoff_delay(config, attempt);
                warn!(
                    operation = what,
                    attempt,
                    max_retries = config.max_retries,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Operation failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e.context(format!("{what} failed after {attempt} retries"))),
        }
    }
}
