//! CLI administration tool for redirect-map.
//!
//! Inspects redirect maps straight from the content database, without going
//! through the HTTP pipeline or its caches.
//!
//! # Usage
//!
//! ```bash
//! # Print a site's rules in match order
//! cargo run --bin redirect-admin -- rules list --site shop
//!
//! # Show which rule a path hits and where it leads
//! cargo run --bin redirect-admin -- rules resolve --site shop --path /old-page --query a=1
//!
//! # Check database connection
//! cargo run --bin redirect-admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server: `DATABASE_URL` (or `DB_*`) and `SITES_FILE`.

use redirect_map::application::services::{
    CachePolicy, RedirectResolver, RuleLoader, SiteResolver,
};
use redirect_map::config::{self, Config};
use redirect_map::domain::entities::SiteDefinition;
use redirect_map::infrastructure::cache::{NullCache, SystemClock};
use redirect_map::infrastructure::multisite::SettingsMultisiteContext;
use redirect_map::infrastructure::persistence::PgContentRepository;
use redirect_map::server::connect_pool;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for inspecting redirect maps.
#[derive(Parser)]
#[command(name = "redirect-admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Inspect redirect rules
    Rules {
        #[command(subcommand)]
        action: RulesAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Rule inspection subcommands.
#[derive(Subcommand)]
enum RulesAction {
    /// List a site's rules in match order
    List {
        /// Site name from the sites file
        #[arg(short, long)]
        site: String,
    },

    /// Resolve a request path against a site's rules
    Resolve {
        /// Site name from the sites file
        #[arg(short, long)]
        site: String,

        /// Request path relative to the site's virtual folder
        #[arg(short, long)]
        path: String,

        /// Query string without the leading `?`
        #[arg(short, long)]
        query: Option<String>,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = config::load_from_env()?;
    let pool = connect_pool(&config).await?;

    match cli.command {
        Commands::Rules { action } => handle_rules_action(action, &config, pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Dispatches rule inspection commands.
async fn handle_rules_action(action: RulesAction, config: &Config, pool: PgPool) -> Result<()> {
    let sites = SiteResolver::new(config::load_sites(&config.sites_file)?);

    let content = Arc::new(PgContentRepository::new(Arc::new(pool)));
    let multisite = Arc::new(SettingsMultisiteContext::new(content.clone()));
    let loader = Arc::new(RuleLoader::new(content, multisite));

    match action {
        RulesAction::List { site } => {
            let site = find_site(&sites, &site)?;
            list_rules(&loader, site).await?;
        }
        RulesAction::Resolve { site, path, query } => {
            let site = find_site(&sites, &site)?;
            resolve_path(loader, site, &path, query.as_deref()).await?;
        }
    }

    Ok(())
}

fn find_site<'a>(sites: &'a SiteResolver, name: &str) -> Result<&'a SiteDefinition> {
    sites.by_name(name).with_context(|| {
        let known: Vec<&str> = sites.sites().iter().map(|s| s.name.as_str()).collect();
        format!("Unknown site '{}' (configured: {})", name, known.join(", "))
    })
}

/// Prints the site's rule table.
///
/// # Output Format
///
/// ```text
/// Redirect rules for shop
///
///   #   Kind             Query  Pattern                        Target
///   ──────────────────────────────────────────────────────────────────────────
///   1   Redirect301      no     /old-page/                     /new-page/
///   2   Redirect302      yes    ^/blog/(.*)  (regex)           /news/$1
/// ```
async fn list_rules(loader: &RuleLoader, site: &SiteDefinition) -> Result<()> {
    println!(
        "{} {}",
        "Redirect rules for".bright_blue().bold(),
        site.name.cyan().bold()
    );
    println!();

    let table = loader
        .load(site)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load rules: {}", e))?;

    if table.is_empty() {
        println!("{}", "  No redirect rules found".yellow());
        return Ok(());
    }

    println!(
        "  {:<3} {:<16} {:<6} {:<30} {}",
        "#".bright_white().bold(),
        "Kind".bright_white().bold(),
        "Query".bright_white().bold(),
        "Pattern".bright_white().bold(),
        "Target".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for (i, rule) in table.iter().enumerate() {
        let pattern = if rule.is_pattern() {
            format!("{}  (regex)", rule.pattern)
        } else {
            rule.pattern.clone()
        };
        let query = if rule.preserve_query_string { "yes" } else { "no" };

        println!(
            "  {:<3} {:<16} {:<6} {:<30} {}",
            (i + 1).to_string().bright_black(),
            rule.kind.to_string(),
            query,
            pattern.cyan(),
            rule.target.bright_white()
        );
    }

    println!();
    println!("  Total: {}", table.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

/// Resolves one path with caching disabled and prints the outcome.
async fn resolve_path(
    loader: Arc<RuleLoader>,
    site: &SiteDefinition,
    path: &str,
    query: Option<&str>,
) -> Result<()> {
    let resolver = RedirectResolver::with_cache(
        Arc::new(NullCache::new()),
        loader,
        Arc::new(SystemClock),
        CachePolicy::new(0),
    );

    let decision = resolver
        .resolve(site, path, query)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to resolve: {}", e))?;

    match decision {
        Some(decision) => {
            println!("{}", "Matched".green().bold());
            println!("  Path:    {}", decision.path.cyan());
            println!("  Pattern: {}", decision.rule.pattern.bright_white());
            println!("  Kind:    {}", decision.kind().to_string().bright_white());
            println!("  Target:  {}", decision.target.bright_yellow().bold());
        }
        None => {
            println!("{}", "No redirect rule matches".yellow());
        }
    }

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            let items: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
                .fetch_one(pool)
                .await?;

            println!("{}", "Database connection OK".green().bold());
            println!("  Items: {}", items.to_string().bright_white());
        }
    }

    Ok(())
}
