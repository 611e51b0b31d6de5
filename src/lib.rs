// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod analyze;
pub mod api;
pub mod clock;
pub mod config;
pub mod engine;
pub mod history;
pub mod logging;
pub mod metrics;
pub mod verdict;

// ---- Re-exports for stable public API ----
pub use crate::analyze::FakeNewsAnalyzer;
pub use crate::api::{create_router, AppState};
pub use crate::config::AnalyzerConfig;
pub use crate::verdict::{AnalysisResult, Verdict};

use crate::history::History;

/// Build the shared state the binary serves: analyzer per config, history loaded from
/// `history_path` when one is configured.
pub fn build_state(cfg: &AnalyzerConfig) -> AppState {
    let analyzer = FakeNewsAnalyzer::from_config(cfg);
    let history = match cfg.history_path.as_ref() {
        Some(p) => History::load(p, cfg.history_capacity),
        None => History::with_capacity(cfg.history_capacity),
    };
    AppState::new(analyzer, history)
}
