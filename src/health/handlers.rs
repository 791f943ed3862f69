use std::sync::Arc;

use axum::{
    Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get,
};
use serde_json::json;

use crate::common::app_state::AppState;

pub fn health_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/detailed", get(health_detailed))
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    "OK".into_response()
}

async fn health_detailed(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let bank = state.get_bank();
    let sessions = state.get_sessions();

    let json = json!({
        "platform": true,
        "questions": bank.questions().len(),
        "categories": bank.categories().len(),
        "active_sessions": sessions.active_sessions(),
        "reveal_window_ms": sessions.reveal_window().as_millis() as u64,
        "session_idle_secs": sessions.idle_timeout().as_secs(),
    });

    (StatusCode::OK, Json(json))
}
