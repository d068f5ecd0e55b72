//! Expiration policy shared by the redirect cache regions.

use chrono::{DateTime, Duration, Utc};

/// Absolute-expiry policy derived from `REDIRECT_CACHE_EXPIRATION_MINUTES`.
///
/// A non-positive number of minutes disables storing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    ttl_minutes: i64,
}

impl CachePolicy {
    pub fn new(ttl_minutes: i64) -> Self {
        Self { ttl_minutes }
    }

    pub fn is_enabled(&self) -> bool {
        self.ttl_minutes > 0
    }

    pub fn ttl_minutes(&self) -> i64 {
        self.ttl_minutes
    }

    /// Absolute expiry for an entry stored at `now`, or `None` when disabled.
    pub fn expires_at(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.is_enabled()
            .then(|| now + Duration::minutes(self.ttl_minutes))
    }
}
