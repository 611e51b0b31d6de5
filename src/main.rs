//! Fake News Analyzer: Binary Entrypoint
//! Boots the Axum HTTP server, wiring config, shared state, metrics and middleware.

use fake_news_analyzer::config::AnalyzerConfig;
use fake_news_analyzer::logging::dev_logging_enabled;
use fake_news_analyzer::metrics::Metrics;
use fake_news_analyzer::{build_state, create_router};
use shuttle_axum::ShuttleAxum;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Enable compact tracing logs in development only (see `logging::dev_logging_enabled`).
fn enable_dev_tracing() {
    if !dev_logging_enabled() {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("analyzer=info,fact_check=info,history=info,warn"));

    // Shuttle may already have installed a subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    // This enables FACT_CHECK_API_KEY / ANALYZER_JITTER from .env.
    let _ = dotenvy::dotenv();

    // Initialize dev tracing early (no-op in production).
    enable_dev_tracing();

    let cfg = AnalyzerConfig::load_default()?;
    let metrics = Metrics::init(cfg.fact_check.cache_ttl_secs)?;

    let state = build_state(&cfg);
    info!(
        target: "analyzer",
        fact_check = state.analyzer.fact_checker().provider_name(),
        jitter = cfg.jitter_amplitude,
        history = state.history.len(),
        "analyzer ready"
    );

    let router = create_router(state).merge(metrics.router());

    Ok(router.into())
}
