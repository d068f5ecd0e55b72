//! DTO for content items served by the fallback handler.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::domain::entities::ContentItem;

/// JSON rendering of a content item.
#[derive(Debug, Serialize)]
pub struct ContentResponse {
    pub id: i64,
    pub database: String,
    pub name: String,
    pub path: String,
    pub template: String,
    /// Field values, sorted by name for stable output.
    pub fields: BTreeMap<String, String>,
}

impl From<ContentItem> for ContentResponse {
    fn from(item: ContentItem) -> Self {
        Self {
            id: item.id,
            database: item.database,
            name: item.name,
            path: item.path,
            template: item.template,
            fields: item.fields.into_iter().collect(),
        }
    }
}
