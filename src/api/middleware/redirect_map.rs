//! Redirect map middleware.
//!
//! Runs after site and item resolution. Requests that did not resolve to a
//! content item are matched against the site's redirect map and either
//! redirected, transferred to another path, or passed on unchanged.
//!
//! # Eligibility
//!
//! A request is considered only when all of these hold:
//!
//! - no [`ResolvedItem`] is attached
//! - a [`SiteContext`] is attached and its site has a content database
//! - the file path is not an external URL
//! - the request path is not a physical file under the static root
//!
//! # Dispatch
//!
//! | Kind              | Response                                          |
//! |-------------------|---------------------------------------------------|
//! | `Redirect301`     | `301 Moved Permanently`, `Location`, empty body   |
//! | `Redirect302`     | `302 Found`, `Location`                           |
//! | `ServerTransfer`  | request rewritten in place, pipeline continues    |
//!
//! A transferred request goes through the gate again, so its new path may
//! itself redirect or transfer, up to [`MAX_TRANSFERS`] transfers.
//! Paths are percent-decoded before matching.

use axum::{
    extract::{Request, State},
    http::{HeaderValue, StatusCode, Uri, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{info, warn};

use super::item::{ResolvedItem, attach_item};
use super::site::attach_site;
use crate::application::services::RedirectDecision;
use crate::domain::entities::{RedirectKind, SiteContext};
use crate::infrastructure::metrics::REDIRECTS_TOTAL;
use crate::state::AppState;
use crate::utils::path::{decode_path, is_external_url, is_physical_file};

/// Server transfers followed for one request before the rewritten request
/// is passed on as is.
pub const MAX_TRANSFERS: usize = 3;

pub async fn layer(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let mut transfers = 0;

    loop {
        if req.extensions().get::<ResolvedItem>().is_some() {
            break;
        }

        let Some(ctx) = req.extensions().get::<SiteContext>().cloned() else {
            break;
        };
        let path = decode_path(req.uri().path());
        let query = req.uri().query().map(str::to_string);

        let Some(decision) = decide(&state, &ctx, &path, query.as_deref()).await else {
            break;
        };

        match decision.kind() {
            RedirectKind::Permanent301 | RedirectKind::Temporary302 => {
                if let Some(response) = redirect(&decision) {
                    count(&decision);
                    return response;
                }
                break;
            }
            RedirectKind::ServerTransfer => {
                if transfers == MAX_TRANSFERS {
                    warn!(
                        "Transfer limit of {} reached at {}, not following {}",
                        MAX_TRANSFERS, decision.path, decision.target
                    );
                    break;
                }
                if !transfer(&state, &mut req, &decision.target).await {
                    break;
                }
                count(&decision);
                transfers += 1;
            }
        }
    }

    next.run(req).await
}

/// Applies the eligibility gate and resolves the request's redirect.
///
/// Resolution errors are logged and the request falls through.
async fn decide(
    state: &AppState,
    ctx: &SiteContext,
    path: &str,
    query: Option<&str>,
) -> Option<RedirectDecision> {
    ctx.site.database.as_ref()?;

    if is_external_url(&ctx.file_path) || is_physical_file(&state.static_root, path).await {
        return None;
    }

    match state.resolver.resolve(&ctx.site, &ctx.file_path, query).await {
        Ok(decision) => decision,
        Err(e) => {
            warn!(
                "Redirect map lookup failed for site {}: {}",
                ctx.site.name, e
            );
            None
        }
    }
}

/// Builds the terminal redirect response. Returns `None` when the target
/// cannot be sent as a `Location` header.
fn redirect(decision: &RedirectDecision) -> Option<Response> {
    let location = match HeaderValue::from_str(&decision.target) {
        Ok(location) => location,
        Err(_) => {
            warn!(
                "Redirect target {:?} for {} is not a valid header value",
                decision.target, decision.path
            );
            return None;
        }
    };

    let status = match decision.kind() {
        RedirectKind::Permanent301 => StatusCode::MOVED_PERMANENTLY,
        _ => StatusCode::FOUND,
    };

    info!(
        "Redirecting {} to {} ({})",
        decision.path,
        decision.target,
        status.as_u16()
    );

    // Outer layers still wrap this response, so headers they add (cookies) are kept.
    Some((status, [(header::LOCATION, location)]).into_response())
}

/// Rewrites the request to `target` and re-runs site and item resolution
/// for the new path. Returns `false` when the target is not a local path.
async fn transfer(state: &AppState, req: &mut Request, target: &str) -> bool {
    if is_external_url(target) {
        warn!("Cannot transfer to external target {}", target);
        return false;
    }

    let local = if target.starts_with('/') {
        target.to_string()
    } else {
        format!("/{}", target)
    };

    let uri = match local.parse::<Uri>() {
        Ok(uri) => uri,
        Err(e) => {
            warn!("Invalid transfer target {}: {}", target, e);
            return false;
        }
    };

    info!("Transferring {} to {}", req.uri().path(), uri);
    *req.uri_mut() = uri;

    attach_site(state, req);
    attach_item(state, req).await;

    true
}

fn count(decision: &RedirectDecision) {
    metrics::counter!(REDIRECTS_TOTAL, "kind" => decision.kind().as_str())
        .increment(1);
}
