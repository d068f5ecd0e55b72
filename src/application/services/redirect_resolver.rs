//! Resolution of a request path to a redirect decision.

use std::sync::Arc;

use tracing::debug;

use super::cache_policy::CachePolicy;
use super::matcher::find_rule;
use super::resolved_path_cache::ResolvedPathCache;
use super::rule_loader::RuleLoader;
use super::rule_table_cache::RuleTableCache;
use super::target_builder::build_target;
use crate::domain::entities::{RedirectKind, RedirectRule, SiteDefinition};
use crate::error::AppError;
use crate::infrastructure::cache::{CacheService, Clock};
use crate::utils::path::normalize_path;

/// Outcome of a successful match.
#[derive(Debug, Clone)]
pub struct RedirectDecision {
    pub rule: Arc<RedirectRule>,
    /// Normalized request path the rule matched.
    pub path: String,
    pub target: String,
    /// True when the rule came from the resolved-path region.
    pub from_cache: bool,
}

impl RedirectDecision {
    pub fn kind(&self) -> RedirectKind {
        self.rule.kind
    }
}

/// Ties the cache regions, the matcher, and the target builder together.
pub struct RedirectResolver {
    rule_tables: RuleTableCache,
    resolved_paths: ResolvedPathCache,
}

impl RedirectResolver {
    pub fn new(rule_tables: RuleTableCache, resolved_paths: ResolvedPathCache) -> Self {
        Self {
            rule_tables,
            resolved_paths,
        }
    }

    /// Wires both regions to the same cache store, clock, and policy.
    pub fn with_cache(
        cache: Arc<dyn CacheService>,
        loader: Arc<RuleLoader>,
        clock: Arc<dyn Clock>,
        policy: CachePolicy,
    ) -> Self {
        Self::new(
            RuleTableCache::new(cache.clone(), loader, clock.clone(), policy),
            ResolvedPathCache::new(cache, clock, policy),
        )
    }

    /// Resolves `file_path` (relative to the site's virtual folder) for `site`.
    ///
    /// Returns `Ok(None)` when the site has no database or no rule matches.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the rule table has to be loaded and
    /// the content store fails.
    pub async fn resolve(
        &self,
        site: &SiteDefinition,
        file_path: &str,
        query: Option<&str>,
    ) -> Result<Option<RedirectDecision>, AppError> {
        let Some(database) = site.database.as_deref() else {
            return Ok(None);
        };

        let path = normalize_path(file_path);

        let cached = self.resolved_paths.get(database, &site.name, &path).await;
        let from_cache = cached.is_some();

        let rule = match cached {
            Some(rule) => Some(rule),
            None => {
                let table = self.rule_tables.get_rule_table(site).await?;
                find_rule(&table, &path)
            }
        };

        let Some(rule) = rule else {
            debug!("No redirect rule for {} on site {}", path, site.name);
            return Ok(None);
        };

        if !from_cache {
            self.resolved_paths
                .put(database, &site.name, &path, rule.clone())
                .await;
        }

        let target = build_target(&rule, &path, query, &site.virtual_folder);
        debug!(
            "Redirect {} -> {} ({}, cached: {})",
            path, target, rule.kind, from_cache
        );

        Ok(Some(RedirectDecision {
            rule,
            path,
            target,
            from_cache,
        }))
    }
}
