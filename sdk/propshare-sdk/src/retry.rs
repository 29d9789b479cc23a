//! Bounded fixed-delay retry and fixed-duration timeout races.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

use crate::error::{Result, WalletError};

/// Run `op`, retrying up to `retries` additional times with a fixed delay
/// between attempts. The last failure is propagated unchanged.
///
/// The delay is constant — no jitter, no backoff. Callers must only wrap
/// operations that are safe to repeat.
pub async fn with_retry<T, E, F, Fut>(mut op: F, retries: u32, delay: Duration) -> std::result::Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
{
    let mut remaining = retries;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(_) if remaining > 0 => {
                debug!(remaining, "operation failed, retrying after fixed delay");
                tokio::time::sleep(delay).await;
                remaining -= 1;
            }
            Err(err) => return Err(err),
        }
    }
}

/// Race `fut` against a fixed deadline.
///
/// On timeout the operation is dropped and any late resolution from the
/// wallet is silently discarded; no cancellation is sent to the wallet.
pub async fn with_timeout<T, F>(duration: Duration, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(duration, fut).await {
        Ok(result) => result,
        Err(_) => Err(WalletError::Timeout),
    }
}
