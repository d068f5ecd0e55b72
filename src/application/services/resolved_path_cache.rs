//! Cache region remembering which rule a request path resolved to.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::warn;

use super::cache_policy::CachePolicy;
use crate::domain::entities::RedirectRule;
use crate::infrastructure::cache::{CacheService, Clock};
use crate::infrastructure::metrics::{CACHE_HITS_TOTAL, CACHE_MISSES_TOTAL};

const KEY_PREFIX: &str = "redirect-map:resolved-mappings";

/// Path -> rule map of one database and site.
///
/// The map keeps the expiry it was created with: adding paths does not
/// extend its lifetime, so a content edit shows up at most one TTL later.
#[derive(Debug, Clone)]
pub struct ResolvedMappings {
    pub expires_at: DateTime<Utc>,
    pub paths: HashMap<String, Arc<RedirectRule>>,
}

/// Memoizes successful matches independently of the rule table region.
///
/// Writers copy the current map, add their path, and store the copy. Two
/// concurrent writers can drop each other's path; the lost path is matched
/// again on its next request.
pub struct ResolvedPathCache {
    cache: Arc<dyn CacheService>,
    clock: Arc<dyn Clock>,
    policy: CachePolicy,
}

impl ResolvedPathCache {
    pub fn new(cache: Arc<dyn CacheService>, clock: Arc<dyn Clock>, policy: CachePolicy) -> Self {
        Self {
            cache,
            clock,
            policy,
        }
    }

    /// Cache key of a site's resolved-path map.
    pub fn key(database: &str, site: &str) -> String {
        format!("{}:{}:{}", KEY_PREFIX, database, site)
    }

    /// Rule previously resolved for `path`, if any.
    pub async fn get(&self, database: &str, site: &str, path: &str) -> Option<Arc<RedirectRule>> {
        let rule = self
            .mappings(&Self::key(database, site))
            .await
            .and_then(|m| m.paths.get(path).cloned());

        let counter = if rule.is_some() {
            CACHE_HITS_TOTAL
        } else {
            CACHE_MISSES_TOTAL
        };
        metrics::counter!(counter, "region" => "resolved_paths").increment(1);

        rule
    }

    /// Records that `path` resolved to `rule`. Does nothing when caching is disabled.
    pub async fn put(&self, database: &str, site: &str, path: &str, rule: Arc<RedirectRule>) {
        if !self.policy.is_enabled() {
            return;
        }

        let key = Self::key(database, site);
        let now = self.clock.now();

        let mut mappings = match self.mappings(&key).await {
            Some(existing) if existing.expires_at > now => existing.as_ref().clone(),
            _ => match self.policy.expires_at(now) {
                Some(expires_at) => ResolvedMappings {
                    expires_at,
                    paths: HashMap::new(),
                },
                None => return,
            },
        };

        mappings.paths.insert(path.to_string(), rule);
        let expires_at = mappings.expires_at;

        if let Err(e) = self.cache.set(&key, Arc::new(mappings), expires_at).await {
            warn!("Failed to cache resolved path {} under {}: {}", path, key, e);
        }
    }

    async fn mappings(&self, key: &str) -> Option<Arc<ResolvedMappings>> {
        if !self.policy.is_enabled() {
            return None;
        }

        match self.cache.get(key).await {
            Ok(Some(value)) => value.downcast::<ResolvedMappings>().ok(),
            Ok(None) => None,
            Err(e) => {
                warn!("Cache error reading {}: {}", key, e);
                None
            }
        }
    }
}
