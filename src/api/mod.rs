//! Transport adapters: the streaming WebSocket channel plus the
//! synchronous image, suggestion, and video endpoints.

pub mod images;
pub mod suggestions;
pub mod videos;
pub mod ws;

use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

/// JSON error body shared by the synchronous endpoints.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
}

pub fn error_response(status: StatusCode, message: &str) -> (StatusCode, Json<ErrorBody>) {
    (
        status,
        Json(ErrorBody {
            message: message.to_string(),
        }),
    )
}
