//! Timeout wrapper for outbound calls.
//!
//! A timed-out model call is surfaced immediately as `DrillError::Timeout`.
//! It is not retried and does not consume the schema retry.

use std::future::Future;
use std::time::Duration;

use crate::types::{DrillError, Result};

/// Execute an async operation with a timeout
///
/// ```ignore
/// let response = with_timeout(
///     Duration::from_secs(120),
///     provider.generate(&system, &user),
///     "drill generation",
/// ).await?;
/// ```
pub async fn with_timeout<T, F>(timeout: Duration, future: F, operation_name: &str) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, future).await {
        Ok(result) => result,
        Err(_) => Err(DrillError::timeout(operation_name, timeout)),
    }
}
