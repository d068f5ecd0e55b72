//! Cache region holding each site's parsed rule table.

use std::sync::Arc;

use tracing::{debug, warn};

use super::cache_policy::CachePolicy;
use super::rule_loader::RuleLoader;
use crate::domain::entities::{RuleTable, SiteDefinition};
use crate::error::AppError;
use crate::infrastructure::cache::{CacheService, Clock};
use crate::infrastructure::metrics::{CACHE_HITS_TOTAL, CACHE_MISSES_TOTAL};

const KEY_PREFIX: &str = "redirect-map:all-mappings";

/// Load-or-build access to rule tables, keyed by database and site.
///
/// Concurrent misses may both build and store a table; the tables are
/// identical for the same content, so the last write simply wins.
pub struct RuleTableCache {
    cache: Arc<dyn CacheService>,
    loader: Arc<RuleLoader>,
    clock: Arc<dyn Clock>,
    policy: CachePolicy,
}

impl RuleTableCache {
    pub fn new(
        cache: Arc<dyn CacheService>,
        loader: Arc<RuleLoader>,
        clock: Arc<dyn Clock>,
        policy: CachePolicy,
    ) -> Self {
        Self {
            cache,
            loader,
            clock,
            policy,
        }
    }

    /// Cache key of a site's rule table.
    pub fn key(database: &str, site: &str) -> String {
        format!("{}:{}:{}", KEY_PREFIX, database, site)
    }

    /// Returns the cached table of `site`, loading it on a miss.
    ///
    /// Loaded tables are stored until the policy's expiry; with caching
    /// disabled every call loads. Empty tables are cached like any other.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the table has to be loaded and the
    /// content store fails.
    pub async fn get_rule_table(&self, site: &SiteDefinition) -> Result<Arc<RuleTable>, AppError> {
        let key = Self::key(site.database.as_deref().unwrap_or_default(), &site.name);

        if self.policy.is_enabled() {
            match self.cache.get(&key).await {
                Ok(Some(value)) => match value.downcast::<RuleTable>() {
                    Ok(table) => {
                        metrics::counter!(CACHE_HITS_TOTAL, "region" => "rule_table")
                            .increment(1);
                        return Ok(table);
                    }
                    Err(_) => warn!("Unexpected value type under cache key {}", key),
                },
                Ok(None) => {}
                Err(e) => warn!("Cache error reading {}: {}", key, e),
            }
        }

        metrics::counter!(CACHE_MISSES_TOTAL, "region" => "rule_table").increment(1);

        let table = Arc::new(self.loader.load(site).await?);

        if let Some(expires_at) = self.policy.expires_at(self.clock.now()) {
            if let Err(e) = self.cache.set(&key, table.clone(), expires_at).await {
                warn!("Failed to cache rule table {}: {}", key, e);
            } else {
                debug!("Cached {} rules under {}", table.len(), key);
            }
        }

        Ok(table)
    }
}
