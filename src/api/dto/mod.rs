//! Data Transfer Objects for HTTP responses.
//!
//! All DTOs are serialized to JSON with Serde.

pub mod content;
pub mod health;
