//! Classified retry: an attempt loop narrowed to the two error kinds
//! eligible for retry. The eligibility rule is fixed (rate limit and
//! external-API errors only), mirroring
//! `original_source/core/google_ads_manager.py`'s
//! `retry_if_exception_type((RateLimitError, ExternalAPIError))`, not
//! caller-supplied.

use crate::backoff::Jittered;
use crate::events::PipelineEvent;
use adgate_core::{Error, ErrorKind, EventListeners};
use std::future::Future;
use std::time::Instant;

/// Whether `kind` is eligible for the pipeline's classified retry — exactly
/// `RateLimit` and `ExternalApi`. `Quota` and `Timeout` are deliberately
/// excluded even though
/// `ErrorKind::default_retryable` considers them retryable in general: a
/// quota failure retried inside a worker slot would just re-fail the same
/// admission check, and a timeout is already the result of waiting as long
/// as this system is willing to.
pub fn is_retry_eligible(kind: ErrorKind) -> bool {
    matches!(kind, ErrorKind::RateLimit | ErrorKind::ExternalApi)
}

/// Runs `attempt_fn` up to `max_attempts` times, retrying only when the
/// returned error is [`is_retry_eligible`], sleeping a [`Jittered`] delay
/// between attempts. Reports outcome via `event_listeners` and `tenant` for
/// attribution, matching `core/google_ads_manager.py`'s
/// `@retry(stop_after_attempt(3), wait_exponential_jitter(initial=1,
/// max=10), retry_if_exception_type(...), reraise=True)` decorator applied
/// to `_search_with_retry`/`_mutate_with_retry`.
pub async fn classified_retry<F, Fut, T>(
    name: &str,
    tenant: &str,
    max_attempts: u32,
    backoff: Jittered,
    event_listeners: &EventListeners<PipelineEvent>,
    mut attempt_fn: F,
) -> Result<T, Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, Error>>,
{
    let mut attempt = 0u32;
    loop {
        match attempt_fn().await {
            Ok(value) => {
                event_listeners.emit(&PipelineEvent::Succeeded {
                    name: name.to_string(),
                    timestamp: Instant::now(),
                    tenant: tenant.to_string(),
                    attempts: attempt + 1,
                });
                return Ok(value);
            }
            Err(error) => {
                let eligible = is_retry_eligible(error.kind);
                let attempts_used = attempt + 1;
                if !eligible || attempts_used >= max_attempts {
                    event_listeners.emit(&PipelineEvent::Exhausted {
                        name: name.to_string(),
                        timestamp: Instant::now(),
                        tenant: tenant.to_string(),
                        attempts: attempts_used,
                        kind: error.kind,
                    });
                    return Err(error);
                }

                let delay = backoff.next(attempt);
                event_listeners.emit(&PipelineEvent::Retrying {
                    name: name.to_string(),
                    timestamp: Instant::now(),
                    tenant: tenant.to_string(),
                    attempt: attempts_used,
                    kind: error.kind,
                    delay,
                });
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
