//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete implementations for content access and caching.
//!
//! # Modules
//!
//! - [`cache`] - Shared process cache (in-memory and no-op implementations)
//! - [`metrics`] - Prometheus recorder and metric names
//! - [`multisite`] - Settings lookup for multi-site content trees
//! - [`persistence`] - PostgreSQL repository implementations

pub mod cache;
pub mod metrics;
pub mod multisite;
pub mod persistence;
