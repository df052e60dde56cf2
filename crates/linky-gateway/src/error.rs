use crate::model::ErrorResponse;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use linky_engine::LinkError;
use thiserror::Error;
use tracing::{error, warn};

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or wrong API key on an `/api` route.
    #[error("unauthorized")]
    Unauthorized,
    #[error("link not found")]
    NotFound,
    #[error(transparent)]
    Link(#[from] LinkError),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Link(LinkError::Validation(_)) => StatusCode::BAD_REQUEST,
            AppError::Link(LinkError::Forbidden) => StatusCode::FORBIDDEN,
            AppError::Link(LinkError::Storage(_)) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Link(LinkError::Hashing(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::Link(LinkError::Storage(e)) => warn!(error = %e, "Storage backend failure"),
            AppError::Link(LinkError::Hashing(e)) => error!(error = %e, "Password hashing failure"),
            _ => {}
        }

        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
