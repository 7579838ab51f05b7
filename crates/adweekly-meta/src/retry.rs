//! Retry with exponential back-off and jitter for Graph API calls.

use std::future::Future;
use std::time::Duration;

use crate::error::MetaError;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// Retriable: timeouts, connection failures, 5xx responses and throttling.
/// Everything else (auth errors, bad parameters, malformed bodies) fails fast.
pub(crate) fn is_retriable(err: &MetaError) -> bool {
    match err {
        MetaError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        MetaError::Api { status, .. } => *status >= 500 || err.is_rate_limited(),
        MetaError::Deserialize { .. }
        | MetaError::Normalization { .. }
        | MetaError::PaginationLimit { .. }
        | MetaError::InvalidConfig(_) => false,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts while
/// `retriable` accepts the error.
///
/// The n-th retry waits `backoff_base_ms * 2^(n-1)` ± 25 % jitter, capped at 60 s.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    retriable: fn(&MetaError) -> bool,
    mut operation: F,
) -> Result<T, MetaError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, MetaError>>,
{
    const MAX_DELAY_MS: u64 = 60_000;
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let computed = backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(10));
                let capped = computed.min(MAX_DELAY_MS);
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let delay_ms = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "Graph API transient error, retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
