use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus exporter and register all application metrics.
/// Returns a `PrometheusHandle` whose `render()` method produces the
/// text/plain Prometheus scrape payload.
pub fn init_metrics() -> PrometheusHandle {
    let builder = PrometheusBuilder::new();
    let handle = builder
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // Pre-register counters so they appear even before the first increment.
    counter!("credits_purchased_total").absolute(0);
    counter!("credits_retired_total").absolute(0);
    counter!("deposits_total").absolute(0);
    counter!("withdrawals_requested_total").absolute(0);
    counter!("integration_syncs_total").absolute(0);
    counter!("price_ticks_total").absolute(0);

    handle
}
