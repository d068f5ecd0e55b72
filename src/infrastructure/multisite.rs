//! Settings lookup for multi-site content trees.
//!
//! Sites are laid out as
//!
//! ```text
//! /sitecore/content/<tenant>/<site>
//!     Home        <- start item
//!     Settings    <- settings item
//!         Redirects (Redirect Map Grouping)
//! ```

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::entities::ContentItem;
use crate::domain::repositories::{ContentRepository, MultisiteContext};
use crate::error::AppError;

/// Name of the settings item under a site root.
pub const SETTINGS_ITEM_NAME: &str = "Settings";

/// Finds the `Settings` sibling of a site's start item.
pub struct SettingsMultisiteContext {
    repository: Arc<dyn ContentRepository>,
}

impl SettingsMultisiteContext {
    pub fn new(repository: Arc<dyn ContentRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl MultisiteContext for SettingsMultisiteContext {
    async fn get_settings_item(
        &self,
        start_item: &ContentItem,
    ) -> Result<Option<ContentItem>, AppError> {
        let Some(site_root) = start_item.parent_path() else {
            return Ok(None);
        };

        let settings_path = format!("{}/{}", site_root, SETTINGS_ITEM_NAME);
        self.repository
            .get_item(&start_item.database, &settings_path)
            .await
    }
}
