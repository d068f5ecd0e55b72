//! Repository trait for hierarchical content records.

use crate::domain::entities::ContentItem;
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for reading the content tree.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgContentRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_content.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Finds an item by its full path within a database. Matching is
    /// case-insensitive and ignores a trailing slash.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn get_item(&self, database: &str, path: &str) -> Result<Option<ContentItem>, AppError>;

    /// Direct children of `item`, ordered by sort order and then name.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn get_children(&self, item: &ContentItem) -> Result<Vec<ContentItem>, AppError>;

    /// All descendants of `item` at any depth.
    ///
    /// The order of the returned items is unspecified; each item carries a
    /// lineage relative to `item` so callers can impose tree order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn get_descendants(&self, item: &ContentItem) -> Result<Vec<ContentItem>, AppError>;

    /// Checks if the content store is reachable.
    async fn health_check(&self) -> bool;
}
