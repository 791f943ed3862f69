use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use crate::quiz::{bank::BankError, store::SessionError};

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Api error: {0} - {1}")]
    Api(StatusCode, String),

    #[error("Question bank error: {0}")]
    Bank(#[from] BankError),

    #[error("Invalid request body: {0}")]
    Json(#[from] JsonRejection),
}

impl From<SessionError> for ServerError {
    fn from(value: SessionError) -> Self {
        match value {
            SessionError::NotFound(_) => ServerError::NotFound(value.to_string()),
            SessionError::UnknownCategory(_) => {
                ServerError::Api(StatusCode::BAD_REQUEST, value.to_string())
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ServerError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ServerError::Api(status, msg) => (status, msg),
            ServerError::Bank(e) => {
                error!("Question bank error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".into())
            }
            ServerError::Json(rejection) => (rejection.status(), rejection.body_text()),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
