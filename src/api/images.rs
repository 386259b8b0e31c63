//! POST /api/images - synchronous image lookup.
//!
//! No synthesis stage; the rephrased query goes straight to the image
//! engines and the flat result list comes back in one response.

use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::{error_response, ErrorBody};
use crate::models::{ConversationTurn, ImageResult};
use crate::pipeline::images::search_images;
use crate::state::AppState;

/// Bounded wait before a hung lookup becomes an error response.
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize)]
pub struct ImagesRequest {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub chat_history: Vec<ConversationTurn>,
}

#[derive(Debug, Serialize)]
pub struct ImagesResponse {
    pub images: Vec<ImageResult>,
}

pub async fn images(
    State(state): State<AppState>,
    Json(req): Json<ImagesRequest>,
) -> Result<Json<ImagesResponse>, (StatusCode, Json<ErrorBody>)> {
    let query = req.query.trim().to_string();
    if query.is_empty() {
        return Err(error_response(StatusCode::BAD_REQUEST, "Query is required"));
    }

    let lookup = search_images(
        state.chat.as_ref(),
        state.search.as_ref(),
        &req.chat_history,
        &query,
    );
    match tokio::time::timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS), lookup).await {
        Ok(Ok(images)) => {
            tracing::info!("Image search returned {} results for {query:?}", images.len());
            Ok(Json(ImagesResponse { images }))
        }
        Ok(Err(e)) => {
            tracing::error!("Image search failed for {query:?}: {e:#}");
            Err(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "An error has occurred.",
            ))
        }
        Err(_) => {
            tracing::error!("Image search timed out after {REQUEST_TIMEOUT_SECS}s for {query:?}");
            Err(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "An error has occurred.",
            ))
        }
    }
}
