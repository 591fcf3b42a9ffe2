//! Transport-level retry for AWS calls.
//!
//! Only failures where the request never produced a service response are
//! retried. A service error is a definitive answer and surfaces immediately,
//! so a rejected login or a missing item is never silently retried.

use std::future::Future;
use std::time::Duration;

use aws_sdk_dynamodb::error::SdkError;

/// Waits applied between attempts. Two waits means three attempts total.
const RETRY_DELAYS_SECS: [u64; 2] = [1, 2];

/// Classifies an error as retryable at the transport level.
pub trait TransientError {
    fn is_transient(&self) -> bool;
}

impl<E, R> TransientError for SdkError<E, R> {
    fn is_transient(&self) -> bool {
        matches!(
            self,
            SdkError::DispatchFailure(_) | SdkError::TimeoutError(_)
        )
    }
}

/// Run `call`, retrying transient transport failures with fixed backoff.
///
/// The closure is invoked once per attempt so each attempt sends a freshly
/// built request.
pub async fn with_transport_retry<T, E, F, Fut>(operation: &str, mut call: F) -> Result<T, E>
where
    E: TransientError + std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    for (attempt, delay_secs) in RETRY_DELAYS_SECS.iter().enumerate() {
        match call().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() => {
                tracing::warn!(
                    operation,
                    attempt = attempt + 1,
                    error = %e,
                    "AWS call failed at transport level, retrying"
                );
                tokio::time::sleep(Duration::from_secs(*delay_secs)).await;
            }
            Err(e) => return Err(e),
        }
    }

    // Final attempt after the last backoff window.
    match call().await {
        Ok(value) => Ok(value),
        Err(e) => {
            tracing::error!(operation, error = %e, "AWS call failed after all retries");
            Err(e)
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct TestError {
        transient: bool,
    }

    impl fmt::Display for TestError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "test error (transient: {})", self.transient)
        }
    }

    impl TransientError for TestError {
        fn is_transient(&self) -> bool {
            self.transient
        }
    }

    #[tokio::test]
    async fn service_error_is_not_retried() {
        let calls = AtomicUsize::new(0);
        let result: Result<(), TestError> = with_transport_retry("op", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(TestError { transient: false }) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn transient_error_exhausts_three_attempts() {
        let calls = AtomicUsize::new(0);
        let result: Result<(), TestError> = with_transport_retry("op", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(TestError { transient: true }) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn transient_error_recovers_on_second_attempt() {
        let calls = AtomicUsize::new(0);
        let result: Result<u32, TestError> = with_transport_retry("op", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err(TestError { transient: true })
                } else {
                    Ok(7)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
