//! Shared process cache for rule tables and resolved paths.
//!
//! Provides a [`CacheService`] trait with two implementations:
//! - [`MemoryCache`] - In-process store with absolute expiry
//! - [`NullCache`] - No-op implementation for disabled caching
//!
//! Expiry is measured against a [`Clock`] so tests can move time forward.

mod clock;
mod memory_cache;
mod null_cache;
mod service;

pub use clock::{Clock, ManualClock, SystemClock};
pub use memory_cache::MemoryCache;
pub use null_cache::NullCache;
pub use service::{CacheError, CacheResult, CacheService, CacheValue};
