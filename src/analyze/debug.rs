//! Debug endpoints: preview individual analyzers and inspect the weighting regimes.
//! Mounted by `api::create_router`; all routes are read-only and side-effect free.

use std::collections::HashMap;

use serde::Serialize;
use shuttle_axum::axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};

use super::emotion::{analyze_emotions, EmotionalAnalysisResult};
use super::heuristics::{analyze_heuristics, HeuristicResult};
use super::scoring::{Weights, FAKE_THRESHOLD, VERIFIED_THRESHOLD, WITHOUT_FACT_CHECK, WITH_FACT_CHECK};
use super::source_credibility::{classify_domain, Reputation};
use crate::api::AppState;

#[derive(Debug, Serialize)]
pub struct DomainOut {
    pub domain: String,
    pub reputation: Reputation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WeightsOut {
    pub with_fact_check: Weights,
    pub without_fact_check: Weights,
    pub jitter_amplitude: f64,
    pub fake_threshold: f64,
    pub verified_threshold: f64,
    pub fact_check_available: bool,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/debug/domain", get(get_domain))
        .route("/debug/emotion", get(get_emotion))
        .route("/debug/heuristics", get(get_heuristics))
        .route("/debug/weights", get(get_weights))
}

/// GET /debug/domain?d=reuters.com
async fn get_domain(Query(q): Query<HashMap<String, String>>) -> Json<DomainOut> {
    let domain = q.get("d").cloned().unwrap_or_default();
    let c = classify_domain(&domain);
    Json(DomainOut {
        domain,
        reputation: c.reputation,
        category: c.category,
    })
}

/// GET /debug/emotion?text=...
async fn get_emotion(Query(q): Query<HashMap<String, String>>) -> Json<EmotionalAnalysisResult> {
    let text = q.get("text").cloned().unwrap_or_default();
    Json(analyze_emotions(&text))
}

/// GET /debug/heuristics?text=...
async fn get_heuristics(Query(q): Query<HashMap<String, String>>) -> Json<HeuristicResult> {
    let text = q.get("text").cloned().unwrap_or_default();
    Json(analyze_heuristics(&text))
}

async fn get_weights(State(state): State<AppState>) -> Json<WeightsOut> {
    Json(WeightsOut {
        with_fact_check: WITH_FACT_CHECK,
        without_fact_check: WITHOUT_FACT_CHECK,
        jitter_amplitude: state.analyzer.jitter_amplitude(),
        fake_threshold: FAKE_THRESHOLD,
        verified_threshold: VERIFIED_THRESHOLD,
        fact_check_available: state.analyzer.fact_checker().is_available(),
    })
}
