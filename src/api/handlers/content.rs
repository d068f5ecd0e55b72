//! Fallback handler rendering the resolved content item.

use axum::{Json, extract::Request};
use serde_json::json;

use crate::api::dto::content::ContentResponse;
use crate::api::middleware::ResolvedItem;
use crate::error::AppError;

/// Serves the request's [`ResolvedItem`] as JSON.
///
/// Runs after static files were tried. Requests without an item (and
/// without a redirect) end here with `404 Not Found`.
pub async fn content_handler(req: Request) -> Result<Json<ContentResponse>, AppError> {
    match req.extensions().get::<ResolvedItem>() {
        Some(ResolvedItem(item)) => Ok(Json(item.clone().into())),
        None => Err(AppError::not_found(
            "Page not found",
            json!({ "path": req.uri().path() }),
        )),
    }
}
