//! Host extraction from HTTP request headers.

use axum::http::{HeaderMap, header};

/// Returns the lowercased host of the request without its port.
///
/// Bracketed IPv6 literals keep their brackets (`[::1]:8080` -> `[::1]`).
/// Returns `None` if the `Host` header is missing or is not valid UTF-8;
/// site resolution then only considers wildcard sites.
pub fn extract_domain_from_headers(headers: &HeaderMap) -> Option<String> {
    let host = headers.get(header::HOST)?.to_str().ok()?;

    let domain = match host.find(']') {
        Some(end) if host.starts_with('[') => &host[..=end],
        _ => host.split(':').next().unwrap_or(host),
    };

    Some(domain.to_lowercase())
}
