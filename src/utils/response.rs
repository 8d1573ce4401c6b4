use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
struct CreatedBody {
    success: bool,
    id: i32,
    message: String,
}

#[derive(Serialize)]
struct MutatedBody {
    success: bool,
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

/// 201 with the newly assigned id.
pub fn created(id: i32, message: impl Into<String>) -> Response {
    let body = CreatedBody {
        success: true,
        id,
        message: message.into(),
    };
    (StatusCode::CREATED, Json(body)).into_response()
}

/// 200 acknowledgement for updates and deletes.
pub fn mutated() -> Response {
    Json(MutatedBody { success: true }).into_response()
}

pub fn error(message: impl Into<String>, status: StatusCode) -> Response {
    let body = ErrorBody {
        success: false,
        error: message.into(),
    };
    (status, Json(body)).into_response()
}
