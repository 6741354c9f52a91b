//! Timeout helpers for collaborator calls.

use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;

/// Result of a timed operation.
#[derive(Debug)]
pub enum TimedResult<T, E> {
    /// Operation completed successfully.
    Ok(T),
    /// Operation failed with an error.
    Err(E),
    /// Operation timed out.
    Timeout,
}

/// Runs a future with a timeout.
pub async fn run_with_timeout<T, E, F>(duration: Duration, future: F) -> TimedResult<T, E>
where
    F: Future<Output = Result<T, E>>,
{
    match timeout(duration, future).await {
        Ok(Ok(value)) => TimedResult::Ok(value),
        Ok(Err(error)) => TimedResult::Err(error),
        Err(_) => TimedResult::Timeout,
    }
}

/// Runs a future, bounded only when a timeout is given.
///
/// The in-flight future is dropped on timeout; nothing else is cancelled.
pub async fn run_with_optional_timeout<T, E, F>(
    duration: Option<Duration>,
    future: F,
) -> TimedResult<T, E>
where
    F: Future<Output = Result<T, E>>,
{
    match duration {
        Some(duration) => run_with_timeout(duration, future).await,
        None => match future.await {
            Ok(value) => TimedResult::Ok(value),
            Err(error) => TimedResult::Err(error),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_with_timeout_success() {
        let result: TimedResult<i32, &str> =
            run_with_timeout(Duration::from_secs(1), async { Ok(42) }).await;
        assert!(matches!(result, TimedResult::Ok(42)));
    }

    #[tokio::test]
    async fn test_run_with_timeout_elapsed() {
        let result: TimedResult<i32, &str> = run_with_timeout(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            Ok(42)
        })
        .await;
        assert!(matches!(result, TimedResult::Timeout));
    }

    #[tokio::test]
    async fn test_optional_timeout_passes_errors_through() {
        let result: TimedResult<i32, &str> =
            run_with_optional_timeout(None, async { Err("boom") }).await;
        assert!(matches!(result, TimedResult::Err("boom")));
    }
}
