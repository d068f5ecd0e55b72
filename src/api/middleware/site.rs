//! Site resolution middleware.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::domain::entities::SiteContext;
use crate::state::AppState;
use crate::utils::extract_domain::extract_domain_from_headers;
use crate::utils::path::decode_path;

/// Attaches the [`SiteContext`] of the request, if a configured site serves it.
///
/// Requests without a site pass through untouched; the redirect map
/// middleware then ignores them.
pub async fn layer(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    attach_site(&state, &mut req);
    next.run(req).await
}

/// Replaces the request's site context with the one matching its current URI.
///
/// The context's file path is percent-decoded.
pub fn attach_site(state: &AppState, req: &mut Request) {
    req.extensions_mut().remove::<SiteContext>();

    let host = extract_domain_from_headers(req.headers());
    let path = decode_path(req.uri().path());
    match state.sites.resolve(host.as_deref(), &path) {
        Some(ctx) => {
            debug!("Site {} serves {}", ctx.site.name, ctx.file_path);
            req.extensions_mut().insert(ctx);
        }
        None => debug!(
            "No site for host {} and path {}",
            host.as_deref().unwrap_or("-"),
            path
        ),
    }
}
