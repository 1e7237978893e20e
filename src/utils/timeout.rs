use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;
use tracing::warn;

use crate::errors::{Result, WatchError};

/// Execute a future with a hard upper bound on its duration
pub async fn with_timeout<F, T>(future: F, duration: Duration, operation_name: &str) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match timeout(duration, future).await {
        Ok(result) => result,
        Err(_) => {
            warn!("Operation '{}' timed out after {:?}", operation_name, duration);
            Err(WatchError::Timeout {
                operation: operation_name.to_string(),
                seconds: duration.as_secs(),
            })
        }
    }
}
