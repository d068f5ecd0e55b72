//! No-op cache implementation for disabled caching.

use super::service::{CacheResult, CacheService, CacheValue};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

/// A cache implementation that does nothing.
///
/// Used when `REDIRECT_CACHE_EXPIRATION_MINUTES` is zero or negative: every
/// read is a miss and every write is dropped.
pub struct NullCache;

impl NullCache {
    /// Creates a new NullCache instance.
    pub fn new() -> Self {
        debug!("Using NullCache (caching disabled)");
        Self
    }
}

impl Default for NullCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheService for NullCache {
    async fn get(&self, _key: &str) -> CacheResult<Option<CacheValue>> {
        Ok(None)
    }

    async fn set(
        &self,
        _key: &str,
        _value: CacheValue,
        _expires_at: DateTime<Utc>,
    ) -> CacheResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
