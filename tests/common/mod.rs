#![allow(dead_code)]

use async_trait::async_trait;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use redirect_map::application::services::{
    CachePolicy, RedirectResolver, RuleLoader, SiteResolver,
};
use redirect_map::domain::entities::{ContentItem, SiteDefinition, TreeStep};
use redirect_map::domain::repositories::ContentRepository;
use redirect_map::error::AppError;
use redirect_map::infrastructure::cache::{CacheService, MemoryCache, NullCache, SystemClock};
use redirect_map::infrastructure::multisite::SettingsMultisiteContext;
use redirect_map::state::AppState;

pub const DATABASE: &str = "web";
pub const SITE_ROOT: &str = "/sitecore/content/tenant/site";
pub const START_PATH: &str = "/sitecore/content/tenant/site/home";
pub const REDIRECTS_PATH: &str = "/sitecore/content/tenant/site/Settings/Redirects";

/// Content tree held in memory, addressed case-insensitively by path.
#[derive(Default)]
pub struct InMemoryContentRepository {
    items: Vec<ContentItem>,
    next_id: i64,
    pub descendant_loads: AtomicUsize,
}

impl InMemoryContentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, path: &str, template: &str, sort_order: i32) -> &mut ContentItem {
        self.next_id += 1;
        let name = path.rsplit('/').next().unwrap_or(path);
        self.items.push(ContentItem::new(
            self.next_id,
            DATABASE,
            name,
            path,
            template,
            sort_order,
        ));
        self.items.last_mut().unwrap()
    }

    /// Adds a redirect map record under the site's rule container.
    pub fn add_redirect_map(
        &mut self,
        name: &str,
        sort_order: i32,
        redirect_type: &str,
        preserve_query_string: bool,
        url_mapping: &str,
    ) {
        let path = format!("{}/{}", REDIRECTS_PATH, name);
        let item = self.add(&path, "Redirect Map", sort_order);
        item.fields.insert("RedirectType".into(), redirect_type.into());
        item.fields.insert(
            "PreserveQueryString".into(),
            if preserve_query_string { "1" } else { "0" }.into(),
        );
        item.fields.insert("UrlMapping".into(), url_mapping.into());
    }

    fn find(&self, database: &str, path: &str) -> Option<&ContentItem> {
        let path = path.trim_end_matches('/');
        self.items
            .iter()
            .find(|i| i.database == database && i.path.eq_ignore_ascii_case(path))
    }

    fn is_below(item: &ContentItem, ancestor: &str) -> bool {
        item.path.len() > ancestor.len() + 1
            && item.path[..ancestor.len()].eq_ignore_ascii_case(ancestor)
            && item.path.as_bytes()[ancestor.len()] == b'/'
    }
}

#[async_trait]
impl ContentRepository for InMemoryContentRepository {
    async fn get_item(&self, database: &str, path: &str) -> Result<Option<ContentItem>, AppError> {
        Ok(self.find(database, path).cloned())
    }

    async fn get_children(&self, item: &ContentItem) -> Result<Vec<ContentItem>, AppError> {
        let mut children: Vec<ContentItem> = self
            .items
            .iter()
            .filter(|i| {
                i.database == item.database
                    && i.parent_path()
                        .is_some_and(|p| p.eq_ignore_ascii_case(&item.path))
            })
            .cloned()
            .collect();
        children.sort_by(|a, b| (a.sort_order, &a.name).cmp(&(b.sort_order, &b.name)));
        Ok(children)
    }

    async fn get_descendants(&self, item: &ContentItem) -> Result<Vec<ContentItem>, AppError> {
        self.descendant_loads.fetch_add(1, Ordering::SeqCst);

        let base = item.path.trim_end_matches('/');
        let descendants = self
            .items
            .iter()
            .filter(|i| i.database == item.database && Self::is_below(i, base))
            .map(|i| {
                let mut lineage = Vec::new();
                let mut current = base.to_string();
                for segment in i.path[base.len() + 1..].split('/') {
                    current = format!("{}/{}", current, segment);
                    if let Some(step) = self.find(&i.database, &current) {
                        lineage.push(TreeStep::new(step.sort_order, step.name.clone()));
                    }
                }
                i.clone().with_lineage(lineage)
            })
            .collect();

        Ok(descendants)
    }

    async fn health_check(&self) -> bool {
        true
    }
}

/// Site tree with a home page, an `about` page and a rule container.
pub fn content_tree() -> InMemoryContentRepository {
    let mut repo = InMemoryContentRepository::new();
    repo.add(SITE_ROOT, "Site", 0);
    repo.add(START_PATH, "Page", 0);
    repo.add(&format!("{}/about", START_PATH), "Page", 0)
        .fields
        .insert("Title".into(), "About us".into());
    repo.add(&format!("{}/Settings", SITE_ROOT), "Site Settings", 10);
    repo.add(REDIRECTS_PATH, "Redirect Map Grouping", 0);
    repo
}

pub fn site(name: &str, host: &str, virtual_folder: &str) -> SiteDefinition {
    SiteDefinition {
        name: name.to_string(),
        host_names: vec![host.to_string()],
        start_path: START_PATH.to_string(),
        database: Some(DATABASE.to_string()),
        virtual_folder: virtual_folder.to_string(),
    }
}

pub fn default_sites() -> Vec<SiteDefinition> {
    vec![
        site("shop", "shop.example.com", "/shop"),
        site("main", "www.example.com", ""),
    ]
}

/// Builds application state over `repo`.
///
/// A positive `cache_minutes` uses an in-memory cache, otherwise caching is off.
pub fn create_test_state(
    repo: Arc<InMemoryContentRepository>,
    sites: Vec<SiteDefinition>,
    cache_minutes: i64,
    static_root: PathBuf,
) -> AppState {
    let metrics = PrometheusBuilder::new().build_recorder().handle();
    create_test_state_with_metrics(repo, sites, cache_minutes, static_root, metrics)
}

/// Like [`create_test_state`], with `/metrics` rendering from `metrics`.
pub fn create_test_state_with_metrics(
    repo: Arc<InMemoryContentRepository>,
    sites: Vec<SiteDefinition>,
    cache_minutes: i64,
    static_root: PathBuf,
    metrics: PrometheusHandle,
) -> AppState {
    let cache: Arc<dyn CacheService> = if cache_minutes > 0 {
        Arc::new(MemoryCache::new())
    } else {
        Arc::new(NullCache::new())
    };

    let multisite = Arc::new(SettingsMultisiteContext::new(repo.clone()));
    let loader = Arc::new(RuleLoader::new(repo.clone(), multisite));
    let resolver = Arc::new(RedirectResolver::with_cache(
        cache.clone(),
        loader,
        Arc::new(SystemClock),
        CachePolicy::new(cache_minutes),
    ));

    AppState::new(
        resolver,
        Arc::new(SiteResolver::new(sites)),
        repo,
        cache,
        static_root,
        metrics,
    )
}

/// Creates an empty static root unique to `name`.
pub fn static_root(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "redirect-map-static-{}-{}",
        name,
        std::process::id()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}
