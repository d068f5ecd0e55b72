//! PostgreSQL repository implementations.
//!
//! # Repositories
//!
//! - [`PgContentRepository`] - Content tree reads (items, children, descendants)

pub mod pg_content_repository;

pub use pg_content_repository::PgContentRepository;
