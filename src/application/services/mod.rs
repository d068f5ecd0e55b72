//! Redirect resolution services.

pub mod cache_policy;
pub mod matcher;
pub mod redirect_resolver;
pub mod resolved_path_cache;
pub mod rule_loader;
pub mod rule_table_cache;
pub mod site_resolver;
pub mod target_builder;

pub use cache_policy::CachePolicy;
pub use matcher::find_rule;
pub use redirect_resolver::{RedirectDecision, RedirectResolver};
pub use resolved_path_cache::{ResolvedMappings, ResolvedPathCache};
pub use rule_loader::RuleLoader;
pub use rule_table_cache::RuleTableCache;
pub use site_resolver::SiteResolver;
pub use target_builder::build_target;
