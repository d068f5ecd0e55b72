//! In-process cache with absolute expiry.

use super::clock::{Clock, SystemClock};
use super::service::{CacheResult, CacheService, CacheValue};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use tracing::debug;

struct Entry {
    value: CacheValue,
    expires_at: DateTime<Utc>,
}

/// Process-wide cache shared by all request tasks.
///
/// Backed by a sharded `DashMap`; writers replace whole entries, so the last
/// write for a key wins. Expired entries are dropped when they are next read,
/// there is no background sweep.
pub struct MemoryCache {
    entries: DashMap<String, Entry>,
    clock: Arc<dyn Clock>,
}

impl MemoryCache {
    /// Creates a cache driven by the wall clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates a cache driven by the given clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            clock,
        }
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheService for MemoryCache {
    async fn get(&self, key: &str) -> CacheResult<Option<CacheValue>> {
        let now = self.clock.now();

        // The shard guard must be released before `remove_if` takes the write lock.
        let live = self
            .entries
            .get(key)
            .map(|entry| (entry.expires_at > now).then(|| entry.value.clone()));

        match live {
            Some(Some(value)) => {
                debug!("Cache HIT: {}", key);
                Ok(Some(value))
            }
            Some(None) => {
                if self
                    .entries
                    .remove_if(key, |_, entry| entry.expires_at <= now)
                    .is_some()
                {
                    debug!("Cache EXPIRE: {}", key);
                }
                Ok(None)
            }
            None => {
                debug!("Cache MISS: {}", key);
                Ok(None)
            }
        }
    }

    async fn set(
        &self,
        key: &str,
        value: CacheValue,
        expires_at: DateTime<Utc>,
    ) -> CacheResult<()> {
        self.entries
            .insert(key.to_string(), Entry { value, expires_at });
        debug!("Cache SET: {} (expires {})", key, expires_at);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
