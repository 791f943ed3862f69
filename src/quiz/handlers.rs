use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    common::{app_state::AppState, server_error::ServerError},
    quiz::models::{
        ALL_CATEGORIES, CreateSessionRequest, PublicQuestion, QuestionsQuery,
        SelectCategoryRequest, SelectOptionRequest,
    },
};

pub fn quiz_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/categories", get(get_categories))
        .route("/questions", get(get_questions))
        .route("/sessions", post(create_session))
        .route(
            "/sessions/{session_id}",
            get(get_session).delete(delete_session),
        )
        .route("/sessions/{session_id}/select", post(select_option))
        .route("/sessions/{session_id}/commit", post(commit_answer))
        .route("/sessions/{session_id}/category", post(select_category))
        .route("/sessions/{session_id}/reset", post(reset_session))
        .route("/sessions/{session_id}/results", get(get_results))
        .route("/sessions/{session_id}/review", get(get_review))
        .with_state(state)
}

/* Question bank */

async fn get_categories(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let summaries = state.get_bank().category_summaries();
    (StatusCode::OK, Json(summaries))
}

async fn get_questions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<QuestionsQuery>,
) -> Result<impl IntoResponse, ServerError> {
    let bank = state.get_bank();
    let category = query.category.as_deref().unwrap_or(ALL_CATEGORIES);

    if !bank.has_category(category) {
        return Err(ServerError::Api(
            StatusCode::BAD_REQUEST,
            format!("Unknown category '{}'", category),
        ));
    }

    let questions: Vec<PublicQuestion> = bank
        .filtered(category)
        .into_iter()
        .map(|q| PublicQuestion::from_question(q, false))
        .collect();

    Ok((StatusCode::OK, Json(questions)))
}

/* Session lifecycle */

async fn create_session(
    State(state): State<Arc<AppState>>,
    request: Result<Option<Json<CreateSessionRequest>>, JsonRejection>,
) -> Result<impl IntoResponse, ServerError> {
    let category = request?.and_then(|Json(r)| r.category);
    let snapshot = state.get_sessions().create(category.as_deref())?;
    Ok((StatusCode::CREATED, Json(snapshot)))
}

async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServerError> {
    let snapshot = state.get_sessions().snapshot(session_id)?;
    Ok((StatusCode::OK, Json(snapshot)))
}

async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServerError> {
    state.get_sessions().remove(session_id)?;
    Ok(StatusCode::NO_CONTENT)
}

/* Transitions */

async fn select_option(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
    request: Result<Json<SelectOptionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ServerError> {
    let Json(request) = request?;
    let response = state
        .get_sessions()
        .select_option(session_id, request.index)?;
    Ok((StatusCode::OK, Json(response)))
}

async fn commit_answer(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServerError> {
    let response = state.get_sessions().commit(session_id)?;
    Ok((StatusCode::OK, Json(response)))
}

async fn select_category(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
    request: Result<Json<SelectCategoryRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ServerError> {
    let Json(request) = request?;
    let response = state
        .get_sessions()
        .select_category(session_id, &request.category)?;
    Ok((StatusCode::OK, Json(response)))
}

async fn reset_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServerError> {
    let response = state.get_sessions().reset(session_id)?;
    Ok((StatusCode::OK, Json(response)))
}

/* Results */

async fn get_results(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServerError> {
    let results = state.get_sessions().results(session_id)?;
    Ok((StatusCode::OK, Json(results)))
}

async fn get_review(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServerError> {
    let review = state.get_sessions().review(session_id)?;
    Ok((StatusCode::OK, Json(review)))
}
