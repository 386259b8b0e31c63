use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Speaker of a conversation turn. The wire accepts the frontend's
/// `human`/`ai` labels as aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "user", alias = "human")]
    User,
    #[serde(rename = "assistant", alias = "ai")]
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A single conversation turn. Immutable once created; history only
/// ever appends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    /// Build history from the streaming channel's `[role, content]` pairs.
    /// Anything that is not a user turn counts as an assistant turn.
    pub fn from_pairs(pairs: &[(String, String)]) -> Vec<Self> {
        pairs
            .iter()
            .map(|(role, content)| match role.as_str() {
                "human" | "user" => Self::user(content.clone()),
                _ => Self::assistant(content.clone()),
            })
            .collect()
    }
}

/// A single chat-API message (system / user / assistant).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// A normalized result from the metasearch aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchDocument {
    pub title: String,
    pub url: String,
    /// Snippet text; falls back to the title when the engine sends none.
    #[serde(default)]
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub img_src: Option<String>,
    /// Aggregator fields with no first-class slot (author, thumbnail).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub extra: HashMap<String, String>,
}

/// A search document scored against the query by the reranker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedDocument {
    #[serde(flatten)]
    pub document: SearchDocument,
    pub relevance: f32,
}

/// Lifecycle events for one pipeline turn, emitted in a fixed order:
/// one `Sources`, zero or more `AnswerChunk`s, then exactly one
/// terminal event (`Complete` or `Failure`).
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    Sources(Vec<RankedDocument>),
    AnswerChunk(String),
    Complete,
    Failure(String),
}

/// One hit returned by the synchronous image lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageResult {
    pub title: String,
    pub url: String,
    pub img_src: String,
}
