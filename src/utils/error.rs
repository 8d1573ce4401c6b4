use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::uploads::ImageError;
use crate::utils::response::error as error_response;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("database error")]
    Database(#[from] sqlx::Error),

    #[error("image storage error")]
    Image(#[from] ImageError),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Image(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn log(&self) {
        match self {
            AppError::Validation(msg) => {
                tracing::debug!(message = %msg, "request validation failed");
            }
            AppError::NotFound(msg) => {
                tracing::debug!(message = %msg, "resource not found");
            }
            AppError::Database(err) => {
                tracing::error!(error = ?err, "database error");
            }
            AppError::Image(err) => {
                tracing::error!(error = ?err, "image storage error");
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Full detail stays server-side
        self.log();

        let public_message = match &self {
            AppError::Validation(msg) | AppError::NotFound(msg) => msg.clone(),
            AppError::Database(_) => "Internal server error".to_string(),
            AppError::Image(_) => "Error saving image".to_string(),
        };

        error_response(public_message, status)
    }
}
