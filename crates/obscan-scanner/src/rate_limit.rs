//! Retry with exponential back-off and jitter for the HTTP transport.
//!
//! Availability endpoints rate-limit aggressively and fail transiently under
//! load, so [`retry_with_backoff`] retries those cases. Anything that will not
//! change on a second attempt is returned immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::TransportError;

const MAX_DELAY_MS: u64 = 60_000;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// **Retriable:**
/// - [`TransportError::RateLimited`] (HTTP 429).
/// - [`TransportError::UnexpectedStatus`] with a 5xx status.
/// - [`TransportError::Http`] timeouts and connection failures.
///
/// **Not retriable:** 4xx statuses, undecodable bodies, invalid headers, and
/// [`TransportError::Timeout`] (the per-seed budget is already spent).
pub(crate) fn is_retriable(err: &TransportError) -> bool {
    match err {
        TransportError::RateLimited { .. } => true,
        TransportError::UnexpectedStatus { status, .. } => (500..600).contains(status),
        TransportError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        TransportError::Timeout { .. }
        | TransportError::Decode { .. }
        | TransportError::InvalidHeader { .. } => false,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on transient errors.
///
/// Back-off schedule with `backoff_base_ms = 500`:
///
/// | Retry | Sleep before it               |
/// |-------|-------------------------------|
/// | 1     | 500 ms × 2⁰ ± 25 % jitter    |
/// | 2     | 500 ms × 2¹ ± 25 % jitter    |
/// | 3     | 500 ms × 2² ± 25 % jitter    |
///
/// A 429 with `Retry-After` waits at least that long. Delay is capped at 60 s.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, TransportError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, TransportError>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let delay_ms = backoff_delay_ms(&err, attempt, backoff_base_ms);
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "transient transport error, retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}

fn backoff_delay_ms(err: &TransportError, attempt: u32, backoff_base_ms: u64) -> u64 {
    let computed = backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(10));
    let capped = computed.min(MAX_DELAY_MS);
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let jittered = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;

    match err {
        TransportError::RateLimited {
            retry_after_secs, ..
        } => jittered
            .max(retry_after_secs.saturating_mul(1000))
            .min(MAX_DELAY_MS),
        _ => jittered,
    }
}
