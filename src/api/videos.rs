//! POST /api/videos - synchronous video search.
//!
//! Runs the full videoSearch pipeline but buffers it to completion
//! instead of streaming, returning sources plus the concatenated
//! answer in one response.

use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::{error_response, ErrorBody};
use crate::focus::FocusMode;
use crate::models::{ConversationTurn, RankedDocument};
use crate::pipeline::GENERIC_FAILURE;
use crate::state::AppState;

const REQUEST_TIMEOUT_SECS: u64 = 30;
const MAX_QUERY_CHARS: usize = 500;

#[derive(Debug, Deserialize)]
pub struct VideosRequest {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub history: Vec<ConversationTurn>,
}

#[derive(Debug, Serialize)]
pub struct VideosResponse {
    pub query: String,
    pub sources: Vec<RankedDocument>,
    pub response: String,
}

pub async fn videos(
    State(state): State<AppState>,
    Json(req): Json<VideosRequest>,
) -> Result<Json<VideosResponse>, (StatusCode, Json<ErrorBody>)> {
    let query = req.query.trim().to_string();
    if query.is_empty() {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            "Query is required and must be a non-empty string",
        ));
    }
    if query.chars().count() > MAX_QUERY_CHARS {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            "Query must be less than 500 characters",
        ));
    }

    // Dropping the turn future on timeout releases the permit and
    // aborts the pipeline task.
    let history = req.history;
    let turn = async {
        let _permit = state
            .pipeline_semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| GENERIC_FAILURE.to_string())?;
        state
            .pipeline()
            .spawn(FocusMode::VideoSearch, query.clone(), history)
            .collect()
            .await
    };
    match tokio::time::timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS), turn).await {
        Ok(Ok((sources, response))) => {
            tracing::info!(
                "Video search returned {} sources for {query:?}",
                sources.len()
            );
            Ok(Json(VideosResponse {
                query,
                sources,
                response: response.trim().to_string(),
            }))
        }
        Ok(Err(reason)) => {
            tracing::error!("Video search failed for {query:?}: {reason}");
            Err(error_response(StatusCode::INTERNAL_SERVER_ERROR, &reason))
        }
        Err(_) => {
            tracing::error!("Video search timed out after {REQUEST_TIMEOUT_SECS}s for {query:?}");
            Err(error_response(
                StatusCode::REQUEST_TIMEOUT,
                "Video search timeout",
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_request() {
        let req: VideosRequest = serde_json::from_str(
            r#"{"query":"rust tutorials","history":[{"role":"human","content":"hi"}]}"#,
        )
        .unwrap();
        assert_eq!(req.query, "rust tutorials");
        assert_eq!(req.history.len(), 1);
    }

    #[test]
    fn test_response_shape() {
        let resp = VideosResponse {
            query: "rust tutorials".to_string(),
            sources: Vec::new(),
            response: "See [1].".to_string(),
        };
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["query"], "rust tutorials");
        assert_eq!(value["response"], "See [1].");
        assert!(value["sources"].as_array().unwrap().is_empty());
    }
}
