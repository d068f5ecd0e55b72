//! Utility functions for request handling.
//!
//! - [`extract_domain`] - Domain extraction from HTTP headers
//! - [`path`] - Request path normalization and physical file checks

pub mod extract_domain;
pub mod path;
