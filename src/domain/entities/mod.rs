//! Domain entities.
//!
//! - [`RedirectRule`] / [`RuleTable`] - parsed redirect mappings in match order
//! - [`ContentItem`] - hierarchical records read from the content store
//! - [`SiteDefinition`] / [`SiteContext`] - configured sites and the per-request site

pub mod content_item;
pub mod redirect_rule;
pub mod site;

pub use content_item::{ContentItem, TreeStep};
pub use redirect_rule::{RedirectKind, RedirectRule, RuleTable, UnknownRedirectKind};
pub use site::{SiteContext, SiteDefinition};
