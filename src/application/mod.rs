//! Application layer: redirect resolution.
//!
//! Services consume the collaborator traits from [`crate::domain::repositories`]
//! and the shared cache from [`crate::infrastructure::cache`].
//!
//! # Request path resolution
//!
//! 1. [`services::ResolvedPathCache`] - paths that matched before
//! 2. [`services::RuleTableCache`] - the site's rule table, built by [`services::RuleLoader`] on a miss
//! 3. [`services::find_rule`] - first matching rule in table order
//! 4. [`services::build_target`] - final redirect URL
//!
//! [`services::RedirectResolver`] runs these steps for one request.

pub mod services;
