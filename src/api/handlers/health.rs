//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components degraded
///
/// # Components Checked
///
/// 1. **Content store**: round trip to the content database
/// 2. **Cache**: shared process cache responds
/// 3. **Sites**: at least one site is configured
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "content_store": { "status": "ok", "message": "Connected" },
///     "cache": { "status": "ok", "message": "Available" },
///     "sites": { "status": "ok", "message": "2 configured" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let content_store = if state.content.health_check().await {
        CheckStatus::ok("Connected")
    } else {
        CheckStatus::error("Content store unreachable")
    };

    let cache = if state.cache.health_check().await {
        CheckStatus::ok("Available")
    } else {
        CheckStatus::error("Cache unavailable")
    };

    let sites = match state.sites.sites().len() {
        0 => CheckStatus::error("No sites configured"),
        n => CheckStatus::ok(format!("{} configured", n)),
    };

    let all_healthy = content_store.is_ok() && cache.is_ok() && sites.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            content_store,
            cache,
            sites,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}
