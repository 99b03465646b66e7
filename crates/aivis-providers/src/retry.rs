//! Retry helpers for the provider layer.
//!
//! Two distinct policies live here. [`complete_with_empty_retry`] guards
//! against providers that intermittently return blank completions under
//! load: a nominally successful but empty answer is retried a fixed number
//! of times with a fixed short delay. [`retry_with_backoff`] is the search
//! client's transport-level policy: exponential back-off with jitter on
//! 429/5xx/network errors.

use std::future::Future;
use std::time::Duration;

use crate::error::ProviderError;
use crate::types::{Source, TokenUsage};

/// Maximum additional attempts after a blank completion.
pub(crate) const EMPTY_ANSWER_RETRIES: u32 = 2;

/// The raw output of one completion attempt, before conversion into a
/// [`crate::ProviderAnswer`].
#[derive(Debug, Clone)]
pub(crate) struct Completion {
    pub text: String,
    pub sources: Vec<Source>,
    pub usage: Option<TokenUsage>,
}

/// Run `attempt` until it yields non-blank text, retrying blank completions
/// up to [`EMPTY_ANSWER_RETRIES`] additional times with a fixed `delay`.
/// A persistent blank is demoted to [`ProviderError::EmptyAnswer`]; real
/// errors are returned immediately without retry (transport-level retry is
/// the transport's concern).
pub(crate) async fn complete_with_empty_retry<F, Fut>(
    delay: Duration,
    attempt: F,
) -> Result<Completion, ProviderError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<Completion, ProviderError>>,
{
    let total_attempts = EMPTY_ANSWER_RETRIES + 1;
    for attempt_no in 1..=total_attempts {
        let completion = attempt().await?;
        if !completion.text.trim().is_empty() {
            return Ok(completion);
        }
        if attempt_no < total_attempts {
            tracing::warn!(attempt = attempt_no, "blank completion — retrying");
            tokio::time::sleep(delay).await;
        }
    }
    Err(ProviderError::EmptyAnswer {
        attempts: total_attempts,
    })
}

/// Returns `true` for search errors worth retrying after a back-off delay:
/// network-level failures (timeout, connect) and HTTP 429/5xx.
pub(crate) fn is_retriable(err: &ProviderError) -> bool {
    match err {
        ProviderError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        ProviderError::Api { status, .. } => *status == 429 || (500..600).contains(status),
        _ => false,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on
/// transient errors, sleeping `backoff_base_ms × 2^(n-1)` ± 25 % jitter
/// before the n-th retry, capped at 30 s.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, ProviderError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ProviderError>>,
{
    const MAX_DELAY_MS: u64 = 30_000;
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
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
                    "transient search error — retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
