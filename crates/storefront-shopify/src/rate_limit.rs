//! Retry with exponential backoff for transient Storefront API failures.
//!
//! Only network failures and HTTP 429 are retried. Everything else, including
//! GraphQL errors and cart `userErrors`, is returned on the first attempt.

use std::future::Future;
use std::time::Duration;

use crate::error::StorefrontError;

fn is_retriable(err: &StorefrontError) -> bool {
    matches!(
        err,
        StorefrontError::RateLimited { .. } | StorefrontError::Http(_)
    )
}

/// Seconds to wait before retry `attempt + 1`. A 429 never waits less than
/// its `Retry-After`.
fn retry_delay(attempt: u32, backoff_base_secs: u64, err: &StorefrontError) -> u64 {
    let backoff = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
    match err {
        StorefrontError::RateLimited {
            retry_after_secs, ..
        } => backoff.max(*retry_after_secs),
        _ => backoff,
    }
}

/// Runs `operation`, retrying transient errors up to `max_retries` times.
///
/// The delay before retry `n` (1-based) is `backoff_base_secs * 2^(n-1)`
/// seconds. With `max_retries = 3` the operation runs at most 4 times.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, StorefrontError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, StorefrontError>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if is_retriable(&err) && attempt < max_retries => {
                let delay_secs = retry_delay(attempt, backoff_base_secs, &err);
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_secs,
                    error = %err,
                    "transient storefront API error; retrying after backoff"
                );
                tokio::time::sleep(Duration::from_secs(delay_secs)).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    fn throttled(retry_after_secs: u64) -> StorefrontError {
        StorefrontError::RateLimited {
            domain: "test.myshopify.com".to_owned(),
            retry_after_secs,
        }
    }

    /// Replays `outcomes` in order, one per attempt, and reports how many
    /// attempts were made.
    async fn replay(
        max_retries: u32,
        outcomes: Vec<Result<&'static str, StorefrontError>>,
    ) -> (Result<&'static str, StorefrontError>, usize) {
        let total = outcomes.len();
        let queue = Mutex::new(VecDeque::from(outcomes));
        let result = retry_with_backoff(max_retries, 0, || {
            let next = queue
                .lock()
                .expect("queue lock")
                .pop_front()
                .expect("operation called more often than scripted");
            async move { next }
        })
        .await;
        let left = queue.lock().expect("queue lock").len();
        (result, total - left)
    }

    #[tokio::test]
    async fn first_success_is_returned_without_retrying() {
        let (result, attempts) = replay(3, vec![Ok("page-1")]).await;
        assert_eq!(result.expect("success"), "page-1");
        assert_eq!(attempts, 1);
    }

    #[tokio::test]
    async fn throttled_calls_are_retried_until_they_succeed() {
        let (result, attempts) =
            replay(3, vec![Err(throttled(0)), Err(throttled(0)), Ok("cart")]).await;
        assert_eq!(result.expect("success"), "cart");
        assert_eq!(attempts, 3);
    }

    #[tokio::test]
    async fn last_error_is_returned_once_retries_run_out() {
        let (result, attempts) = replay(
            1,
            vec![Err(throttled(0)), Err(throttled(0)), Ok("unreached")],
        )
        .await;
        assert_eq!(attempts, 2);
        assert!(matches!(result, Err(StorefrontError::RateLimited { .. })));
    }

    #[tokio::test]
    async fn permanent_errors_fail_on_the_first_attempt() {
        let permanent = [
            StorefrontError::GraphQl {
                operation: "getProducts".to_owned(),
                messages: vec!["Field 'nope' doesn't exist".to_owned()],
            },
            StorefrontError::NotFound {
                resource: "product trail-runner".to_owned(),
            },
            StorefrontError::UserErrors {
                operation: "cartLinesAdd".to_owned(),
                message: "variant is sold out".to_owned(),
            },
        ];
        for err in permanent {
            let (result, attempts) = replay(3, vec![Err(err), Ok("unreached")]).await;
            assert_eq!(attempts, 1);
            assert!(result.is_err());
        }
    }

    #[test]
    fn delay_doubles_per_attempt() {
        let err = StorefrontError::UnexpectedStatus {
            status: 503,
            url: "https://shop.example.com".to_owned(),
        };
        let delays: Vec<u64> = (0..4).map(|n| retry_delay(n, 2, &err)).collect();
        assert_eq!(delays, vec![2, 4, 8, 16]);
    }

    #[test]
    fn delay_honours_longer_retry_after() {
        assert_eq!(retry_delay(0, 1, &throttled(30)), 30);
        assert_eq!(retry_delay(3, 10, &throttled(30)), 80);
    }
}
