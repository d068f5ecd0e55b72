//! HTTP server initialization and runtime setup.
//!
//! Handles the database pool, migrations, cache selection, service wiring,
//! and the Axum server lifecycle.

use crate::application::services::{CachePolicy, RedirectResolver, RuleLoader, SiteResolver};
use crate::config::{Config, load_sites};
use crate::infrastructure::cache::{CacheService, MemoryCache, NullCache, SystemClock};
use crate::infrastructure::metrics;
use crate::infrastructure::multisite::SettingsMultisiteContext;
use crate::infrastructure::persistence::PgContentRepository;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Opens the PostgreSQL pool with the configured limits.
///
/// # Errors
///
/// Returns an error if the database cannot be reached.
pub async fn connect_pool(config: &Config) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Site definitions from the sites file
/// - PostgreSQL connection pool
/// - Apply migrations
/// - In-memory cache (or NullCache when caching is disabled)
/// - Prometheus recorder
/// - Redirect resolver
/// - Axum HTTP server
///
/// # Errors
///
/// Returns an error if:
/// - The sites file is missing or invalid
/// - Database connection or migration fails
/// - The metrics recorder cannot be installed
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let sites = load_sites(&config.sites_file)?;
    tracing::info!(
        "Loaded {} site(s) from {}",
        sites.len(),
        config.sites_file.display()
    );

    let pool = connect_pool(&config).await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to migrate")?;

    let cache: Arc<dyn CacheService> = if config.is_cache_enabled() {
        tracing::info!(
            "Cache enabled (in-memory, {} minutes)",
            config.cache_expiration_minutes
        );
        Arc::new(MemoryCache::new())
    } else {
        tracing::info!("Cache disabled (NullCache)");
        Arc::new(NullCache::new())
    };

    let metrics = metrics::install().context("Failed to install metrics recorder")?;

    let content = Arc::new(PgContentRepository::new(Arc::new(pool)));
    let multisite = Arc::new(SettingsMultisiteContext::new(content.clone()));
    let loader = Arc::new(RuleLoader::new(content.clone(), multisite));

    let resolver = Arc::new(RedirectResolver::with_cache(
        cache.clone(),
        loader,
        Arc::new(SystemClock),
        CachePolicy::new(config.cache_expiration_minutes),
    ));

    let state = AppState::new(
        resolver,
        Arc::new(SiteResolver::new(sites)),
        content,
        cache,
        config.static_root.clone(),
        metrics,
    );

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
