//! Builds a site's rule table from redirect map records.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info};

use crate::domain::entities::{ContentItem, RedirectKind, RedirectRule, RuleTable, SiteDefinition};
use crate::domain::repositories::{ContentRepository, MultisiteContext};
use crate::domain::tree_order::{ItemComparator, tree_order};
use crate::error::AppError;
use crate::utils::path::ensure_slashes;

/// Template of the item grouping a site's redirect maps.
pub const REDIRECT_MAP_GROUPING_TEMPLATE: &str = "Redirect Map Grouping";
/// Template of a redirect map record.
pub const REDIRECT_MAP_TEMPLATE: &str = "Redirect Map";

pub const REDIRECT_TYPE_FIELD: &str = "RedirectType";
pub const PRESERVE_QUERY_STRING_FIELD: &str = "PreserveQueryString";
pub const URL_MAPPING_FIELD: &str = "UrlMapping";

/// Reads redirect map records for a site and parses them into a [`RuleTable`].
///
/// Records are collected from every level below the site's rule container and
/// ordered with a pluggable comparator (tree order by default); that order is
/// the match precedence.
pub struct RuleLoader {
    repository: Arc<dyn ContentRepository>,
    multisite: Arc<dyn MultisiteContext>,
    comparator: ItemComparator,
}

impl RuleLoader {
    /// Creates a loader that orders records by their position in the tree.
    pub fn new(repository: Arc<dyn ContentRepository>, multisite: Arc<dyn MultisiteContext>) -> Self {
        Self {
            repository,
            multisite,
            comparator: tree_order,
        }
    }

    /// Replaces the record comparator.
    pub fn with_comparator(mut self, comparator: ItemComparator) -> Self {
        self.comparator = comparator;
        self
    }

    /// Loads the rule table of `site`.
    ///
    /// A site without a database, start item, settings item, or rule
    /// container has an empty table.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the content store fails.
    pub async fn load(&self, site: &SiteDefinition) -> Result<RuleTable, AppError> {
        let Some(container) = self.find_rule_container(site).await? else {
            debug!("No redirect map container for site {}", site.name);
            return Ok(RuleTable::empty());
        };

        let records: Vec<ContentItem> = self
            .repository
            .get_descendants(&container)
            .await?
            .into_iter()
            .filter(|item| item.is_template(REDIRECT_MAP_TEMPLATE))
            .collect();

        let table = self.build_table(records);
        debug!(
            "Loaded {} redirect rules for site {} from {}",
            table.len(),
            site.name,
            container.path
        );

        Ok(table)
    }

    /// Locates the first rule container under the site's settings item.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the content store fails.
    pub async fn find_rule_container(
        &self,
        site: &SiteDefinition,
    ) -> Result<Option<ContentItem>, AppError> {
        let Some(database) = site.database.as_deref() else {
            return Ok(None);
        };

        let Some(start_item) = self.repository.get_item(database, &site.start_path).await? else {
            return Ok(None);
        };

        let Some(settings) = self.multisite.get_settings_item(&start_item).await? else {
            return Ok(None);
        };

        let container = self
            .repository
            .get_children(&settings)
            .await?
            .into_iter()
            .find(|child| child.is_template(REDIRECT_MAP_GROUPING_TEMPLATE));

        Ok(container)
    }

    /// Orders records and parses every one of them into rules.
    pub fn build_table(&self, mut records: Vec<ContentItem>) -> RuleTable {
        records.sort_by(self.comparator);

        let rules = records.iter().flat_map(parse_record).collect();
        RuleTable::new(rules)
    }
}

/// Parses one redirect map record.
///
/// A record without a valid redirect type contributes no rules. Every
/// `pattern=target` pair of the URL mapping field with a non-empty key and
/// value becomes one rule, in field order.
pub fn parse_record(item: &ContentItem) -> Vec<RedirectRule> {
    let kind = match item.field(REDIRECT_TYPE_FIELD).parse::<RedirectKind>() {
        Ok(kind) => kind,
        Err(_) => {
            info!(
                item = %item.path,
                "Redirect map {} does not specify redirect type.", item.path
            );
            return Vec::new();
        }
    };

    let preserve_query_string = parse_bool(item.field(PRESERVE_QUERY_STRING_FIELD), false);

    url::form_urlencoded::parse(item.field(URL_MAPPING_FIELD).as_bytes())
        .filter(|(key, value)| !key.is_empty() && !value.is_empty())
        .filter_map(|(key, value)| parse_pair(item, &key, &value, kind, preserve_query_string))
        .collect()
}

fn parse_pair(
    item: &ContentItem,
    key: &str,
    value: &str,
    kind: RedirectKind,
    preserve_query_string: bool,
) -> Option<RedirectRule> {
    let pattern = key.to_lowercase();
    let target = value
        .to_lowercase()
        .trim_start_matches('^')
        .trim_end_matches('$')
        .to_string();

    if is_regex_pattern(&pattern) {
        match RedirectRule::regex(pattern, target, kind, preserve_query_string) {
            Ok(rule) => Some(rule),
            Err(e) => {
                info!(
                    item = %item.path,
                    details = %json!({ "pattern": key, "reason": e.to_string() }),
                    "Redirect map {} has an invalid pattern, skipping it.", item.path
                );
                None
            }
        }
    } else {
        Some(RedirectRule::literal(
            ensure_slashes(&pattern),
            target,
            kind,
            preserve_query_string,
        ))
    }
}

/// A mapping key is a regular expression when it is anchored at both ends.
pub fn is_regex_pattern(key: &str) -> bool {
    key.starts_with('^') && key.ends_with('$')
}

/// Reads a checkbox-style field: `1`/`0` or `true`/`false`.
fn parse_bool(value: &str, default: bool) -> bool {
    match value.trim() {
        "1" => true,
        "0" => false,
        v if v.eq_ignore_ascii_case("true") => true,
        v if v.eq_ignore_ascii_case("false") => false,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::TreeStep;
    use crate::domain::repositories::{MockContentRepository, MockMultisiteContext};
    use std::cmp::Ordering;

    fn record(id: i64, order: i32, kind: &str, mapping: &str) -> ContentItem {
        let name = format!("map-{}", id);
        ContentItem::new(
            id,
            "web",
            name.clone(),
            format!("/sitecore/content/site/settings/redirects/{}", name),
            REDIRECT_MAP_TEMPLATE,
            order,
        )
        .with_field(REDIRECT_TYPE_FIELD, kind)
        .with_field(URL_MAPPING_FIELD, mapping)
        .with_lineage(vec![TreeStep::new(order, name)])
    }

    fn site() -> SiteDefinition {
        SiteDefinition {
            name: "site".to_string(),
            host_names: vec!["*".to_string()],
            start_path: "/sitecore/content/site/home".to_string(),
            database: Some("web".to_string()),
            virtual_folder: String::new(),
        }
    }

    #[test]
    fn test_parse_literal_pair_normalizes_key() {
        let item = record(1, 0, "Redirect301", "Old-Page=%2Fnew-page%2F");
        let rules = parse_record(&item);

        assert_eq!(rules.len(), 1);
        assert!(!rules[0].is_pattern());
        assert_eq!(rules[0].pattern, "/old-page/");
        assert_eq!(rules[0].target, "/new-page/");
        assert_eq!(rules[0].kind, RedirectKind::Permanent301);
        assert!(!rules[0].preserve_query_string);
    }

    #[test]
    fn test_parse_pattern_pair_keeps_anchors_on_key_only() {
        let item = record(1, 0, "Redirect302", "%5E%2Fblog%2F(.*)%24=%5E%2Fnews%2F%241%24");
        let rules = parse_record(&item);

        assert_eq!(rules.len(), 1);
        assert!(rules[0].is_pattern());
        assert_eq!(rules[0].pattern, "^/blog/(.*)$");
        assert_eq!(rules[0].target, "/news/$1");
    }

    #[test]
    fn test_target_is_lowercased() {
        let item = record(1, 0, "Redirect301", "/a=%2FNew%2FPage");
        assert_eq!(parse_record(&item)[0].target, "/new/page");
    }

    #[test]
    fn test_skips_empty_keys_and_values() {
        let item = record(1, 0, "Redirect301", "=%2Fx&%2Fy=&%2Fz=%2Fzz");
        let rules = parse_record(&item);

        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].pattern, "/z/");
    }

    #[test]
    fn test_missing_redirect_type_skips_record() {
        let item = record(1, 0, "", "%2Fa=%2Fb");
        assert!(parse_record(&item).is_empty());

        let item = record(2, 0, "Bogus", "%2Fa=%2Fb");
        assert!(parse_record(&item).is_empty());
    }

    #[test]
    fn test_invalid_pattern_skips_pair_only() {
        let item = record(1, 0, "Redirect301", "%5E(%24=%2Fbroken&%2Fok=%2Ffine");
        let rules = parse_record(&item);

        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].pattern, "/ok/");
    }

    #[test]
    fn test_preserve_query_string_flag() {
        let item = record(1, 0, "ServerTransfer", "%2Fa=%2Fb").with_field(PRESERVE_QUERY_STRING_FIELD, "1");
        let rules = parse_record(&item);

        assert!(rules[0].preserve_query_string);
        assert_eq!(rules[0].kind, RedirectKind::ServerTransfer);
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("1", false));
        assert!(parse_bool("True", false));
        assert!(!parse_bool("0", true));
        assert!(!parse_bool("", false));
        assert!(parse_bool("garbage", true));
    }

    #[test]
    fn test_build_table_orders_by_comparator() {
        let loader = RuleLoader::new(
            Arc::new(MockContentRepository::new()),
            Arc::new(MockMultisiteContext::new()),
        );

        let late = record(1, 200, "Redirect301", "%2Fa=%2Flate");
        let early = record(2, 100, "Redirect301", "%2Fa=%2Fearly");
        let table = loader.build_table(vec![late, early]);

        let targets: Vec<&str> = table.iter().map(|r| r.target.as_str()).collect();
        assert_eq!(targets, vec!["/early", "/late"]);
    }

    #[test]
    fn test_custom_comparator() {
        fn by_id_desc(a: &ContentItem, b: &ContentItem) -> Ordering {
            b.id.cmp(&a.id)
        }

        let loader = RuleLoader::new(
            Arc::new(MockContentRepository::new()),
            Arc::new(MockMultisiteContext::new()),
        )
        .with_comparator(by_id_desc);

        let first = record(1, 0, "Redirect301", "%2Fa=%2Fone");
        let second = record(2, 0, "Redirect301", "%2Fa=%2Ftwo");
        let table = loader.build_table(vec![first, second]);

        assert_eq!(table.iter().next().unwrap().target, "/two");
    }

    #[tokio::test]
    async fn test_load_collects_descendant_maps() {
        let mut repo = MockContentRepository::new();
        let mut multisite = MockMultisiteContext::new();

        repo.expect_get_item()
            .withf(|db, path| db == "web" && path == "/sitecore/content/site/home")
            .times(1)
            .returning(|_, _| {
                Ok(Some(ContentItem::new(
                    1,
                    "web",
                    "home",
                    "/sitecore/content/site/home",
                    "Page",
                    0,
                )))
            });

        multisite.expect_get_settings_item().times(1).returning(|_| {
            Ok(Some(ContentItem::new(
                2,
                "web",
                "settings",
                "/sitecore/content/site/settings",
                "Settings",
                0,
            )))
        });

        repo.expect_get_children().times(1).returning(|_| {
            Ok(vec![
                ContentItem::new(3, "web", "other", "/x/other", "Folder", 0),
                ContentItem::new(
                    4,
                    "web",
                    "redirects",
                    "/sitecore/content/site/settings/redirects",
                    REDIRECT_MAP_GROUPING_TEMPLATE,
                    1,
                ),
            ])
        });

        repo.expect_get_descendants()
            .withf(|item| item.id == 4)
            .times(1)
            .returning(|_| {
                let folder = ContentItem::new(5, "web", "folder", "/f", "Redirect Map Folder", 0)
                    .with_lineage(vec![TreeStep::new(0, "folder")]);
                let nested = record(6, 0, "Redirect301", "%2Fnested=%2Fn")
                    .with_lineage(vec![TreeStep::new(0, "folder"), TreeStep::new(0, "inner")]);
                let top = record(7, 10, "Redirect302", "%2Ftop=%2Ft");
                Ok(vec![top, folder, nested])
            });

        let loader = RuleLoader::new(Arc::new(repo), Arc::new(multisite));
        let table = loader.load(&site()).await.unwrap();

        let patterns: Vec<&str> = table.iter().map(|r| r.pattern.as_str()).collect();
        assert_eq!(patterns, vec!["/nested/", "/top/"]);
    }

    #[tokio::test]
    async fn test_load_without_container_is_empty() {
        let mut repo = MockContentRepository::new();
        let multisite = MockMultisiteContext::new();

        repo.expect_get_item().times(1).returning(|_, _| Ok(None));

        let loader = RuleLoader::new(Arc::new(repo), Arc::new(multisite));
        let table = loader.load(&site()).await.unwrap();

        assert!(table.is_empty());
    }

    #[tokio::test]
    async fn test_load_without_database_is_empty() {
        let loader = RuleLoader::new(
            Arc::new(MockContentRepository::new()),
            Arc::new(MockMultisiteContext::new()),
        );
        let mut site = site();
        site.database = None;

        assert!(loader.load(&site).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_load_propagates_store_errors() {
        let mut repo = MockContentRepository::new();
        repo.expect_get_item()
            .times(1)
            .returning(|_, _| Err(AppError::internal("Database error", json!({}))));

        let loader = RuleLoader::new(Arc::new(repo), Arc::new(MockMultisiteContext::new()));
        assert!(loader.load(&site()).await.is_err());
    }
}
