//! PostgreSQL implementation of the content repository.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use sqlx::types::Json;
use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::entities::{ContentItem, TreeStep};
use crate::domain::repositories::ContentRepository;
use crate::error::AppError;

/// PostgreSQL repository over the `items` table.
///
/// Every item row stores its parent, full path, template name, sort order,
/// and a JSON object of field values. Non-string values are read as their
/// JSON text, so `true` becomes `"true"` and `null` an empty string.
pub struct PgContentRepository {
    pool: Arc<PgPool>,
}

impl PgContentRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ItemRow {
    id: i64,
    database: String,
    name: String,
    path: String,
    template: String,
    sort_order: i32,
    fields: Json<HashMap<String, Value>>,
}

impl From<ItemRow> for ContentItem {
    fn from(row: ItemRow) -> Self {
        let mut item = ContentItem::new(
            row.id,
            row.database,
            row.name,
            row.path,
            row.template,
            row.sort_order,
        );
        item.fields = row
            .fields
            .0
            .into_iter()
            .map(|(name, value)| (name, field_text(value)))
            .collect();
        item
    }
}

fn field_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[derive(sqlx::FromRow)]
struct DescendantRow {
    #[sqlx(flatten)]
    item: ItemRow,
    lineage_orders: Vec<i32>,
    lineage_names: Vec<String>,
}

impl From<DescendantRow> for ContentItem {
    fn from(row: DescendantRow) -> Self {
        let lineage = row
            .lineage_orders
            .into_iter()
            .zip(row.lineage_names)
            .map(|(order, name)| TreeStep::new(order, name))
            .collect();

        ContentItem::from(row.item).with_lineage(lineage)
    }
}

/// Strips a trailing slash, keeping a bare `/` intact.
fn item_path(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}

#[async_trait]
impl ContentRepository for PgContentRepository {
    async fn get_item(&self, database: &str, path: &str) -> Result<Option<ContentItem>, AppError> {
        let row = sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT id, database, name, path, template, sort_order, fields
            FROM items
            WHERE database = $1 AND lower(path) = lower($2)
            "#,
        )
        .bind(database)
        .bind(item_path(path))
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(ContentItem::from))
    }

    async fn get_children(&self, item: &ContentItem) -> Result<Vec<ContentItem>, AppError> {
        let rows = sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT id, database, name, path, template, sort_order, fields
            FROM items
            WHERE parent_id = $1
            ORDER BY sort_order, lower(name)
            "#,
        )
        .bind(item.id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(ContentItem::from).collect())
    }

    async fn get_descendants(&self, item: &ContentItem) -> Result<Vec<ContentItem>, AppError> {
        let rows = sqlx::query_as::<_, DescendantRow>(
            r#"
            WITH RECURSIVE tree AS (
                SELECT id, database, name, path, template, sort_order, fields,
                       ARRAY[sort_order] AS lineage_orders,
                       ARRAY[name] AS lineage_names
                FROM items
                WHERE parent_id = $1
                UNION ALL
                SELECT i.id, i.database, i.name, i.path, i.template, i.sort_order, i.fields,
                       t.lineage_orders || i.sort_order,
                       t.lineage_names || i.name
                FROM items i
                JOIN tree t ON i.parent_id = t.id
            )
            SELECT id, database, name, path, template, sort_order, fields,
                   lineage_orders, lineage_names
            FROM tree
            "#,
        )
        .bind(item.id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(ContentItem::from).collect())
    }

    async fn health_check(&self) -> bool {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(self.pool.as_ref())
            .await
            .is_ok()
    }
}
