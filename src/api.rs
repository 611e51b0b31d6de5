use std::sync::Arc;

use serde::{Deserialize, Serialize};
use shuttle_axum::axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;
use tracing::warn;

use crate::analyze::{debug, FakeNewsAnalyzer};
use crate::history::History;
use crate::verdict::AnalysisResult;

#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<FakeNewsAnalyzer>,
    pub history: Arc<History>,
}

impl AppState {
    pub fn new(analyzer: FakeNewsAnalyzer, history: History) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
            history: Arc::new(history),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/analyze", post(analyze))
        .route("/history", get(list_history).delete(clear_history))
        .merge(debug::router())
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(Deserialize)]
struct AnalyzeReq {
    text: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

fn bad_request(msg: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody {
            error: msg.to_string(),
        }),
    )
        .into_response()
}

async fn analyze(State(state): State<AppState>, Json(body): Json<AnalyzeReq>) -> Response {
    if body.text.trim().is_empty() {
        return bad_request("text must not be empty");
    }
    let result = state.analyzer.analyze(&body.text).await;
    let history = Arc::clone(&state.history);
    let entry = result.clone();
    // push may rewrite the history file
    if let Err(e) = tokio::task::spawn_blocking(move || history.push(entry)).await {
        warn!(target: "history", error = %e, "history push task failed");
    }
    Json(result).into_response()
}

async fn list_history(State(state): State<AppState>) -> Json<Vec<AnalysisResult>> {
    Json(state.history.snapshot())
}

async fn clear_history(State(state): State<AppState>) -> StatusCode {
    let history = Arc::clone(&state.history);
    match tokio::task::spawn_blocking(move || history.clear()).await {
        Ok(()) => StatusCode::NO_CONTENT,
        Err(e) => {
            warn!(target: "history", error = %e, "history clear task failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
