//! Collaborator trait definitions for the domain layer.
//!
//! These traits abstract the content store and the multi-site lookup the
//! redirect resolver depends on. Concrete implementations live in
//! `crate::infrastructure`.
//!
//! - [`ContentRepository`] - Reading items of the content tree
//! - [`MultisiteContext`] - Locating a site's settings item
//!
//! Mock implementations are auto-generated via `mockall` for unit tests.

pub mod content_repository;
pub mod multisite_context;

pub use content_repository::ContentRepository;
pub use multisite_context::MultisiteContext;

#[cfg(test)]
pub use content_repository::MockContentRepository;
#[cfg(test)]
pub use multisite_context::MockMultisiteContext;
