// API errors - Maps engine and request failures onto HTTP responses
use crate::application::engine_actor::EngineStopped;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The engine task is gone, so nothing can be read or changed.
    #[error("dashboard engine unavailable")]
    EngineUnavailable(#[from] EngineStopped),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match &self {
            Self::EngineUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "engine_unavailable"),
            Self::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
        };
        let body = ErrorResponse {
            error,
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
