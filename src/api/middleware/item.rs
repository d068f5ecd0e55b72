//! Content item resolution middleware.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

use crate::domain::entities::{ContentItem, SiteContext};
use crate::state::AppState;

/// The content item a request resolved to.
///
/// Its presence means the request is served by regular content and the
/// redirect map stays out of the way.
#[derive(Debug, Clone)]
pub struct ResolvedItem(pub ContentItem);

pub async fn layer(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    attach_item(&state, &mut req).await;
    next.run(req).await
}

/// Looks up the item under the site's start path and attaches it as
/// [`ResolvedItem`]. Any previously attached item is dropped first.
///
/// Content store failures are logged and treated as "no item".
pub async fn attach_item(state: &AppState, req: &mut Request) {
    req.extensions_mut().remove::<ResolvedItem>();

    let Some((database, path)) = req
        .extensions()
        .get::<SiteContext>()
        .and_then(|ctx| {
            let database = ctx.site.database.clone()?;
            Some((database, item_path(&ctx.site.start_path, &ctx.file_path)))
        })
    else {
        return;
    };

    match state.content.get_item(&database, &path).await {
        Ok(Some(item)) => {
            debug!("Resolved content item {}", item.path);
            req.extensions_mut().insert(ResolvedItem(item));
        }
        Ok(None) => {}
        Err(e) => warn!("Failed to resolve content item {}: {}", path, e),
    }
}

/// Content tree path addressed by `file_path` under `start_path`.
pub fn item_path(start_path: &str, file_path: &str) -> String {
    let start = start_path.trim_end_matches('/');
    let relative = file_path.trim_matches('/');

    if relative.is_empty() {
        start.to_string()
    } else {
        format!("{}/{}", start, relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_path() {
        assert_eq!(item_path("/content/home", "/"), "/content/home");
        assert_eq!(item_path("/content/home/", "/about/"), "/content/home/about");
        assert_eq!(item_path("/content/home", "/a/b"), "/content/home/a/b");
    }
}
