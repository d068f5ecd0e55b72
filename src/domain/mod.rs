//! Domain layer containing entities and collaborator contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Redirect rules, content items, and site definitions
//! - [`repositories`] - Content store and multi-site trait definitions
//! - [`tree_order`] - Comparator that fixes rule precedence
//!
//! The domain layer has no dependencies on infrastructure or presentation
//! layers; redirect resolution itself lives in [`crate::application::services`].

pub mod entities;
pub mod repositories;
pub mod tree_order;
