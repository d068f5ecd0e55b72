//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET /health` - Health check: content store, cache, sites
//! - `GET /metrics` - Prometheus scrape
//! - everything else - the redirect pipeline, ending in static files or content
//!
//! # Pipeline
//!
//! Outermost first:
//!
//! 1. **Tracing** - request span and response log (all routes)
//! 2. **Site** - attaches the matching site and file path
//! 3. **Item** - attaches the content item addressed by the file path
//! 4. **Redirect map** - redirects or transfers unresolved requests
//! 5. **Fallback** - file under the static root, else the item as JSON, else 404

use crate::api::handlers::{content_handler, health_handler, metrics_handler};
use crate::api::middleware::{item, redirect_map, site, tracing};
use crate::state::AppState;
use axum::handler::HandlerWithoutStateExt;
use axum::routing::get;
use axum::{Router, middleware};
use tower_http::services::ServeDir;

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> Router {
    let content = ServeDir::new(state.static_root.as_path())
        .append_index_html_on_directories(false)
        .call_fallback_on_method_not_allowed(true)
        .fallback(content_handler.into_service());

    let pipeline = Router::new()
        .fallback_service(content)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            redirect_map::layer,
        ))
        .layer(middleware::from_fn_with_state(state.clone(), item::layer))
        .layer(middleware::from_fn_with_state(state.clone(), site::layer));

    Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
        .merge(pipeline)
        .layer(tracing::layer())
}
