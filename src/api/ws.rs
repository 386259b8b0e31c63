//! GET /ws - the streaming chat channel.
//!
//! Each inbound `message` frame runs one pipeline turn; events are
//! relayed as tagged JSON frames correlated by a per-turn message
//! id. Turns on one socket run sequentially. If the client goes away
//! mid-turn, dropping the run aborts the pipeline task.

use anyhow::Result;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::focus::FocusMode;
use crate::models::{ConversationTurn, PipelineEvent, RankedDocument};
use crate::state::AppState;

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// One query frame from the client. History arrives as
/// `[role, content]` pairs, oldest first.
#[derive(Debug, Deserialize)]
struct ClientMessage {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    message: String,
    #[serde(rename = "focusMode", default = "default_focus_mode")]
    focus_mode: String,
    #[serde(default)]
    history: Vec<(String, String)>,
}

fn default_focus_mode() -> String {
    "webSearch".to_string()
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
enum ServerMessage {
    #[serde(rename = "sources")]
    Sources {
        data: Vec<RankedDocument>,
        #[serde(rename = "messageId")]
        message_id: String,
    },
    #[serde(rename = "message")]
    Message {
        data: String,
        #[serde(rename = "messageId")]
        message_id: String,
    },
    #[serde(rename = "messageEnd")]
    MessageEnd {
        #[serde(rename = "messageId")]
        message_id: String,
    },
    #[serde(rename = "error")]
    Error { data: String },
}

async fn handle_socket(mut socket: WebSocket, state: AppState) {
    tracing::debug!("WebSocket client connected");

    while let Some(frame) = socket.recv().await {
        let frame = match frame {
            Ok(frame) => frame,
            Err(e) => {
                tracing::debug!("WebSocket receive error: {e}");
                break;
            }
        };
        match frame {
            Message::Text(text) => {
                if run_turn(&mut socket, &state, text.as_str()).await.is_err() {
                    break; // send failed, client gone
                }
            }
            Message::Close(_) => break,
            _ => {} // ping/pong
        }
    }

    tracing::debug!("WebSocket client disconnected");
}

/// Handle one inbound frame. `Err` means the transport is dead;
/// malformed input is answered with an `error` frame and is not an
/// error here.
async fn run_turn(socket: &mut WebSocket, state: &AppState, text: &str) -> Result<()> {
    let parsed: ClientMessage = match serde_json::from_str(text) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::debug!("Rejected malformed frame: {e}");
            return send_event(
                socket,
                &ServerMessage::Error {
                    data: "Invalid message format.".to_string(),
                },
            )
            .await;
        }
    };

    if parsed.kind != "message" {
        tracing::debug!("Ignoring frame of type {:?}", parsed.kind);
        return Ok(());
    }

    let query = parsed.message.trim().to_string();
    if query.is_empty() {
        return send_event(
            socket,
            &ServerMessage::Error {
                data: "Invalid message format.".to_string(),
            },
        )
        .await;
    }

    let mode = match FocusMode::parse(&parsed.focus_mode) {
        Some(mode) => mode,
        None => {
            return send_event(
                socket,
                &ServerMessage::Error {
                    data: format!("Invalid focus mode: {}", parsed.focus_mode),
                },
            )
            .await;
        }
    };

    let _permit = match state.pipeline_semaphore.clone().acquire_owned().await {
        Ok(permit) => permit,
        Err(e) => {
            tracing::error!("Pipeline semaphore closed: {e}");
            return send_event(
                socket,
                &ServerMessage::Error {
                    data: crate::pipeline::GENERIC_FAILURE.to_string(),
                },
            )
            .await;
        }
    };

    let message_id = Uuid::new_v4().simple().to_string();
    let history = ConversationTurn::from_pairs(&parsed.history);
    tracing::info!(
        "Turn {message_id} started: mode={} history_len={}",
        mode.as_str(),
        history.len()
    );

    let mut run = state.pipeline().spawn(mode, query, history);
    while let Some(event) = run.events.recv().await {
        let outbound = match event {
            PipelineEvent::Sources(docs) => ServerMessage::Sources {
                data: docs,
                message_id: message_id.clone(),
            },
            PipelineEvent::AnswerChunk(chunk) => ServerMessage::Message {
                data: chunk,
                message_id: message_id.clone(),
            },
            PipelineEvent::Complete => ServerMessage::MessageEnd {
                message_id: message_id.clone(),
            },
            PipelineEvent::Failure(reason) => ServerMessage::Error { data: reason },
        };
        send_event(socket, &outbound).await?;
    }

    tracing::info!("Turn {message_id} finished");
    Ok(())
}

/// Serialization failures are logged and skipped; only transport
/// failures propagate.
async fn send_event(socket: &mut WebSocket, event: &ServerMessage) -> Result<()> {
    let json = match serde_json::to_string(event) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!("Failed to serialize outbound event: {e}");
            return Ok(());
        }
    };
    socket.send(Message::Text(json.into())).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SearchDocument;
    use serde_json::json;

    #[test]
    fn test_parse_client_message() {
        let parsed: ClientMessage = serde_json::from_str(
            r#"{"type":"message","message":"rust?","focusMode":"academicSearch","history":[["human","hi"],["assistant","hello"]]}"#,
        )
        .unwrap();
        assert_eq!(parsed.kind, "message");
        assert_eq!(parsed.message, "rust?");
        assert_eq!(parsed.focus_mode, "academicSearch");
        assert_eq!(parsed.history.len(), 2);
        assert_eq!(parsed.history[0].0, "human");
        assert_eq!(parsed.history[1].1, "hello");
    }

    #[test]
    fn test_parse_defaults_focus_mode_and_history() {
        let parsed: ClientMessage =
            serde_json::from_str(r#"{"type":"message","message":"rust?"}"#).unwrap();
        assert_eq!(parsed.focus_mode, "webSearch");
        assert!(parsed.history.is_empty());
    }

    #[test]
    fn test_parse_rejects_non_object() {
        assert!(serde_json::from_str::<ClientMessage>("[1,2]").is_err());
        assert!(serde_json::from_str::<ClientMessage>("not json").is_err());
    }

    #[test]
    fn test_sources_frame_shape() {
        let frame = ServerMessage::Sources {
            data: vec![RankedDocument {
                document: SearchDocument {
                    title: "Rust".to_string(),
                    url: "https://rust-lang.org".to_string(),
                    body: "A language".to_string(),
                    img_src: None,
                    extra: Default::default(),
                },
                relevance: 0.5,
            }],
            message_id: "abc123".to_string(),
        };
        let value = serde_json::to_value(&frame).unwrap();
        assert_eq!(value["type"], "sources");
        assert_eq!(value["messageId"], "abc123");
        assert_eq!(value["data"][0]["title"], "Rust");
        assert_eq!(value["data"][0]["relevance"], json!(0.5));
    }

    #[test]
    fn test_chunk_and_terminal_frame_shapes() {
        let chunk = ServerMessage::Message {
            data: "Rust is".to_string(),
            message_id: "abc123".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&chunk).unwrap(),
            json!({"type": "message", "data": "Rust is", "messageId": "abc123"})
        );

        let end = ServerMessage::MessageEnd {
            message_id: "abc123".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&end).unwrap(),
            json!({"type": "messageEnd", "messageId": "abc123"})
        );

        let error = ServerMessage::Error {
            data: "boom".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&error).unwrap(),
            json!({"type": "error", "data": "boom"})
        );
    }
}
