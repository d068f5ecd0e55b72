//! PostgreSQL content repository tests.
//!
//! Need a database: `DATABASE_URL=... cargo test -- --ignored`.

use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use redirect_map::domain::entities::TreeStep;
use redirect_map::domain::repositories::ContentRepository;
use redirect_map::infrastructure::persistence::PgContentRepository;

async fn insert_item(
    pool: &PgPool,
    parent_id: Option<i64>,
    path: &str,
    template: &str,
    sort_order: i32,
    fields: serde_json::Value,
) -> i64 {
    let name = path.rsplit('/').next().unwrap();
    sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO items (database, parent_id, name, path, template, sort_order, fields)
        VALUES ('web', $1, $2, $3, $4, $5, $6)
        RETURNING id
        "#,
    )
    .bind(parent_id)
    .bind(name)
    .bind(path)
    .bind(template)
    .bind(sort_order)
    .bind(fields)
    .fetch_one(pool)
    .await
    .unwrap()
}

/// `/site` with `home`, `Settings/Redirects/{b,a/nested}`.
async fn seed(pool: &PgPool) {
    let site = insert_item(pool, None, "/site", "Site", 0, json!({})).await;
    insert_item(pool, Some(site), "/site/home", "Page", 0, json!({"Title": "Home"})).await;
    let settings = insert_item(pool, Some(site), "/site/Settings", "Site Settings", 1, json!({})).await;
    let redirects = insert_item(
        pool,
        Some(settings),
        "/site/Settings/Redirects",
        "Redirect Map Grouping",
        0,
        json!({}),
    )
    .await;
    insert_item(pool, Some(redirects), "/site/Settings/Redirects/b", "Redirect Map", 2, json!({})).await;
    let a = insert_item(pool, Some(redirects), "/site/Settings/Redirects/a", "Redirect Map Folder", 1, json!({})).await;
    insert_item(
        pool,
        Some(a),
        "/site/Settings/Redirects/a/nested",
        "Redirect Map",
        0,
        json!({
            "RedirectType": "Redirect301",
            "PreserveQueryString": true,
            "UrlMapping": "%2Fold=%2Fnew"
        }),
    )
    .await;
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_get_item_is_case_insensitive(pool: PgPool) {
    seed(&pool).await;
    let repo = PgContentRepository::new(Arc::new(pool));

    let item = repo.get_item("web", "/SITE/Home/").await.unwrap().unwrap();

    assert_eq!(item.name, "home");
    assert_eq!(item.field("Title"), "Home");
    assert!(repo.get_item("master", "/site/home").await.unwrap().is_none());
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_get_children_ordered(pool: PgPool) {
    seed(&pool).await;
    let repo = PgContentRepository::new(Arc::new(pool));

    let site = repo.get_item("web", "/site").await.unwrap().unwrap();
    let children = repo.get_children(&site).await.unwrap();

    let names: Vec<&str> = children.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["home", "Settings"]);
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_get_descendants_with_lineage(pool: PgPool) {
    seed(&pool).await;
    let repo = PgContentRepository::new(Arc::new(pool));

    let container = repo
        .get_item("web", "/site/Settings/Redirects")
        .await
        .unwrap()
        .unwrap();
    let descendants = repo.get_descendants(&container).await.unwrap();

    assert_eq!(descendants.len(), 3);

    let nested = descendants.iter().find(|d| d.name == "nested").unwrap();
    assert_eq!(
        nested.lineage,
        vec![TreeStep::new(1, "a"), TreeStep::new(0, "nested")]
    );
    assert_eq!(nested.field("RedirectType"), "Redirect301");
    assert_eq!(nested.field("PreserveQueryString"), "true");
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_health_check(pool: PgPool) {
    let repo = PgContentRepository::new(Arc::new(pool));
    assert!(repo.health_check().await);
}
