//! Content item entity: one hierarchical record from the content store.

use std::collections::HashMap;

/// One step of an item's position in the content tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeStep {
    pub sort_order: i32,
    pub name: String,
}

impl TreeStep {
    pub fn new(sort_order: i32, name: impl Into<String>) -> Self {
        Self {
            sort_order,
            name: name.into(),
        }
    }
}

/// A record from the content repository.
///
/// `lineage` holds the steps from the item the enumeration started at down to
/// this item. Items returned by [`get_descendants`] therefore share a common
/// origin and can be ordered by comparing lineages; single-item lookups carry
/// only their own step.
///
/// [`get_descendants`]: crate::domain::repositories::ContentRepository::get_descendants
#[derive(Debug, Clone, PartialEq)]
pub struct ContentItem {
    pub id: i64,
    pub database: String,
    pub name: String,
    pub path: String,
    pub template: String,
    pub sort_order: i32,
    pub fields: HashMap<String, String>,
    pub lineage: Vec<TreeStep>,
}

impl ContentItem {
    /// Creates an item whose lineage is just its own step.
    pub fn new(
        id: i64,
        database: impl Into<String>,
        name: impl Into<String>,
        path: impl Into<String>,
        template: impl Into<String>,
        sort_order: i32,
    ) -> Self {
        let name = name.into();
        Self {
            id,
            database: database.into(),
            lineage: vec![TreeStep::new(sort_order, name.clone())],
            name,
            path: path.into(),
            template: template.into(),
            sort_order,
            fields: HashMap::new(),
        }
    }

    /// Builder-style field setter.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Replaces the lineage, used when enumerating descendants.
    pub fn with_lineage(mut self, lineage: Vec<TreeStep>) -> Self {
        self.lineage = lineage;
        self
    }

    /// Raw field value, empty when the field is not set.
    pub fn field(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or("")
    }

    /// Whether the item was created from the given template.
    pub fn is_template(&self, template: &str) -> bool {
        self.template.eq_ignore_ascii_case(template)
    }

    /// Path of the parent item, `None` for a root item.
    pub fn parent_path(&self) -> Option<&str> {
        let trimmed = self.path.trim_end_matches('/');
        match trimmed.rfind('/') {
            Some(0) | None => None,
            Some(idx) => Some(&trimmed[..idx]),
        }
    }
}
