//! Browser sleeps for timeouts and polling loops.
//!
//! Outside the browser there is no timer: [`sleep_ms`] never resolves, so
//! [`with_timeout`] simply awaits the operation.

#[cfg(test)]
#[path = "timer_test.rs"]
mod timer_test;

use std::future::Future;

use futures::future::{self, Either};

use crate::error::ServiceError;

/// Resolve after `ms` milliseconds.
pub async fn sleep_ms(ms: u64) {
    #[cfg(feature = "csr")]
    {
        gloo_timers::future::sleep(std::time::Duration::from_millis(ms)).await;
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = ms;
        future::pending::<()>().await;
    }
}

/// Run `operation`, giving up with [`ServiceError::TimedOut`] after `ms`.
/// The operation is dropped on timeout; a request already sent may still
/// complete server-side.
///
/// # Errors
///
/// The operation's own error, or `TimedOut`.
pub async fn with_timeout<T, F>(operation: F, ms: u64) -> Result<T, ServiceError>
where
    F: Future<Output = Result<T, ServiceError>>,
{
    race(operation, sleep_ms(ms)).await
}

async fn race<T, F, S>(operation: F, timeout: S) -> Result<T, ServiceError>
where
    F: Future<Output = Result<T, ServiceError>>,
    S: Future<Output = ()>,
{
    match future::select(std::pin::pin!(operation), std::pin::pin!(timeout)).await {
        Either::Left((result, _)) => result,
        Either::Right(((), _)) => Err(ServiceError::TimedOut),
    }
}
