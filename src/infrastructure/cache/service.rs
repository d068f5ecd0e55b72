//! Cache service trait and error types.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::any::Any;
use std::sync::Arc;

/// Errors that can occur during cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache operation error: {0}")]
    OperationError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Type-erased cached value.
///
/// Values are shared, not copied: a cached rule table keeps its compiled
/// expressions across requests.
pub type CacheValue = Arc<dyn Any + Send + Sync>;

/// Process-wide key/value store with absolute expiry.
///
/// Implementations must be thread-safe. Expiry is lazy: an entry past its
/// expiry is reported as a miss on the next read.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::MemoryCache`] - in-process store
/// - [`crate::infrastructure::cache::NullCache`] - no-op implementation for disabled caching
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Retrieves a value.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(value))` on an unexpired hit
    /// - `Ok(None)` on a miss or an expired entry
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::OperationError`] if the store cannot be read.
    async fn get(&self, key: &str) -> CacheResult<Option<CacheValue>>;

    /// Stores a value that expires at `expires_at`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::OperationError`] if the store cannot be written.
    async fn set(&self, key: &str, value: CacheValue, expires_at: DateTime<Utc>)
    -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;
}
