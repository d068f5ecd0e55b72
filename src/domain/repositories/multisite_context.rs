//! Multi-site lookup of a site's settings item.

use crate::domain::entities::ContentItem;
use crate::error::AppError;
use async_trait::async_trait;

/// Locates per-site configuration in the content tree.
///
/// # Implementations
///
/// - [`crate::infrastructure::multisite::SettingsMultisiteContext`] - settings
///   item stored next to the site's home item
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MultisiteContext: Send + Sync {
    /// Returns the settings item of the site whose home item is `start_item`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn get_settings_item(
        &self,
        start_item: &ContentItem,
    ) -> Result<Option<ContentItem>, AppError>;
}
