//! Shared application state injected into middleware and handlers.

use metrics_exporter_prometheus::PrometheusHandle;
use std::path::PathBuf;
use std::sync::Arc;

use crate::application::services::{RedirectResolver, SiteResolver};
use crate::domain::repositories::ContentRepository;
use crate::infrastructure::cache::CacheService;

#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<RedirectResolver>,
    pub sites: Arc<SiteResolver>,
    pub content: Arc<dyn ContentRepository>,
    pub cache: Arc<dyn CacheService>,
    /// Directory whose files are served as-is and never redirected.
    pub static_root: Arc<PathBuf>,
    pub metrics: PrometheusHandle,
}

impl AppState {
    pub fn new(
        resolver: Arc<RedirectResolver>,
        sites: Arc<SiteResolver>,
        content: Arc<dyn ContentRepository>,
        cache: Arc<dyn CacheService>,
        static_root: PathBuf,
        metrics: PrometheusHandle,
    ) -> Self {
        Self {
            resolver,
            sites,
            content,
            cache,
            static_root: Arc::new(static_root),
            metrics,
        }
    }
}
