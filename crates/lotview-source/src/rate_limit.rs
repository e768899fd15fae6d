//! Retry with exponential backoff for inventory fetches.
//!
//! Network failures and 5xx responses are retried; everything else (404,
//! other 4xx, malformed payloads, `ok == false`) is returned immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::SourceError;

fn is_retriable(err: &SourceError) -> bool {
    match err {
        SourceError::Http(_) => true,
        SourceError::UnexpectedStatus { status, .. } => *status >= 500,
        _ => false,
    }
}

/// Runs `operation`, retrying transient failures up to `max_retries` times.
///
/// The wait before retry `n` (zero-based) is `backoff_base_secs * 2^n`
/// seconds, so `max_retries = 2` with a base of 1 sleeps 1 s then 2 s and
/// makes at most three attempts.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, SourceError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, SourceError>>,
{
    let mut attempt = 0u32;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if !is_retriable(&err) || attempt >= max_retries => return Err(err),
            Err(err) => err,
        };

        let delay_secs = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
        tracing::warn!(
            attempt,
            max_retries,
            delay_secs,
            error = %err,
            "transient inventory fetch error, retrying after backoff"
        );
        tokio::time::sleep(Duration::from_secs(delay_secs)).await;
        attempt += 1;
    }
}
