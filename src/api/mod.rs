//! HTTP layer: the redirect pipeline and its surrounding endpoints.
//!
//! # Modules
//!
//! - [`dto`] - Response bodies
//! - [`handlers`] - Health check and content fallback handlers
//! - [`middleware`] - Site, item and redirect resolution plus request tracing

pub mod dto;
pub mod handlers;
pub mod middleware;
