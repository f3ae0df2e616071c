use anyhow::Error;
use reqwest::StatusCode;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Whether a failed request is worth sending again: connection failures,
/// timeouts, throttling and server errors. Any other 4xx is final.
pub fn is_transient(err: &reqwest::Error) -> bool {
    match err.status() {
        Some(status) => status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS,
        None => err.is_connect() || err.is_timeout(),
    }
}

/// Runs `request`, retrying transient failures up to `retries` more times
/// with `delay_ms` between attempts.
///
/// Returns the first non-transient error as-is, or the last error once the
/// retries are used up.
pub async fn with_retry<F, Fut, T>(mut request: F, retries: usize, delay_ms: u64) -> Result<T, Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, reqwest::Error>>,
{
    let mut retries_left = retries;
    loop {
        let err = match request().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if retries_left == 0 || !is_transient(&err) {
            return Err(err.into());
        }
        retries_left -= 1;
        debug!(
            error = %err,
            retries_left,
            "Transient request failure, retrying"
        );
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }
}
