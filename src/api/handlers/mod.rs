//! HTTP request handlers.

pub mod content;
pub mod health;
pub mod metrics;

pub use content::content_handler;
pub use health::health_handler;
pub use metrics::metrics_handler;
