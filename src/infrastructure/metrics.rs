//! Prometheus exposition of the service's counters.
//!
//! # Metrics
//! - `redirect_map_redirects_total` (counter): redirects and transfers by `kind`
//! - `redirect_map_cache_hits_total` (counter): cache hits by `region`
//! - `redirect_map_cache_misses_total` (counter): cache misses by `region`

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

pub const REDIRECTS_TOTAL: &str = "redirect_map_redirects_total";
pub const CACHE_HITS_TOTAL: &str = "redirect_map_cache_hits_total";
pub const CACHE_MISSES_TOTAL: &str = "redirect_map_cache_misses_total";

/// Installs the Prometheus recorder as the global metrics recorder.
///
/// The returned handle renders the scrape text for `/metrics`.
///
/// # Errors
///
/// Returns an error if a global recorder is already installed.
pub fn install() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    describe();
    Ok(handle)
}

fn describe() {
    metrics::describe_counter!(
        REDIRECTS_TOTAL,
        "Requests redirected or transferred by the redirect map"
    );
    metrics::describe_counter!(CACHE_HITS_TOTAL, "Redirect cache hits");
    metrics::describe_counter!(CACHE_MISSES_TOTAL, "Redirect cache misses");
}
