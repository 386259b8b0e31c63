//! POST /api/suggestions - follow-up question generation.
//!
//! Generation problems degrade to the fixed fallback list; only a
//! malformed request body produces a non-200 response.

use std::time::Duration;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::{error_response, ErrorBody};
use crate::models::ConversationTurn;
use crate::pipeline::suggest::{generate_suggestions, FALLBACK_SUGGESTIONS};
use crate::state::AppState;

const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize)]
pub struct SuggestionsRequest {
    #[serde(rename = "chatHistory", default)]
    pub chat_history: Vec<ConversationTurn>,
}

#[derive(Debug, Serialize)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<String>,
}

pub async fn suggestions(
    State(state): State<AppState>,
    payload: Result<Json<SuggestionsRequest>, JsonRejection>,
) -> Result<Json<SuggestionsResponse>, (StatusCode, Json<ErrorBody>)> {
    let Json(req) = payload.map_err(|e| {
        tracing::debug!("Rejected suggestions request: {e}");
        error_response(StatusCode::BAD_REQUEST, "Invalid request body")
    })?;

    let generation = generate_suggestions(state.chat.as_ref(), &req.chat_history);
    let suggestions =
        match tokio::time::timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS), generation).await {
            Ok(suggestions) => suggestions,
            Err(_) => {
                tracing::warn!("Suggestion generation timed out after {REQUEST_TIMEOUT_SECS}s");
                FALLBACK_SUGGESTIONS.iter().map(|s| s.to_string()).collect()
            }
        };
    Ok(Json(SuggestionsResponse { suggestions }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_request_camel_case_history() {
        let req: SuggestionsRequest = serde_json::from_str(
            r#"{"chatHistory":[{"role":"user","content":"tell me about rust"}]}"#,
        )
        .unwrap();
        assert_eq!(req.chat_history.len(), 1);
        assert_eq!(req.chat_history[0].content, "tell me about rust");
    }

    #[test]
    fn test_parse_request_empty_object() {
        let req: SuggestionsRequest = serde_json::from_str("{}").unwrap();
        assert!(req.chat_history.is_empty());
    }
}
