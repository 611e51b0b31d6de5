// src/metrics.rs
use metrics::{describe_counter, describe_gauge, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use axum::{routing::get, Router};

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder and expose a static gauge for the fact-check cache TTL.
    pub fn init(cache_ttl_secs: i64) -> anyhow::Result<Self> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .map_err(|e| anyhow::anyhow!("prometheus: install recorder: {e}"))?;

        describe_counter!("analysis_verdict_total", "Completed analyses by verdict");
        describe_counter!(
            "fact_check_requests_total",
            "Fact-check lookups by outcome (cache_hit, fetched, error)"
        );
        describe_gauge!("fact_check_cache_ttl_secs", "Fact-check cache freshness window");

        // absolute TTL, no sliding refresh
        gauge!("fact_check_cache_ttl_secs").set(cache_ttl_secs as f64);

        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router<S>(&self) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}
