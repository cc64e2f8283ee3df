use std::{error::Error, future::Future, time::Duration};

use thiserror::Error;
use tokio::time::timeout;

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by storage backends regardless of the underlying database.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {message}")]
    Unavailable {
        message: String,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    #[error("storage operation `{operation}` timed out after {}ms", .after.as_millis())]
    Timeout {
        operation: &'static str,
        after: Duration,
    },
}

impl StorageError {
    /// Construct an unavailable error from any backend failure.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Unavailable {
            message,
            source: Box::new(source),
        }
    }
}

/// Await a storage future, failing with [`StorageError::Timeout`] once `limit` elapses.
pub async fn bounded<T, F>(operation: &'static str, limit: Duration, future: F) -> StorageResult<T>
where
    F: Future<Output = StorageResult<T>>,
{
    match timeout(limit, future).await {
        Ok(result) => result,
        Err(_) => Err(StorageError::Timeout {
            operation,
            after: limit,
        }),
    }
}
