use crate::llm::ChatModel;
use crate::models::{ChatMessage, ConversationTurn};
use crate::prompts;

/// Served whenever the model's suggestions cannot be used.
pub const FALLBACK_SUGGESTIONS: [&str; 4] = [
    "Can you provide more details about this topic?",
    "What are the latest developments in this area?",
    "How does this compare to similar concepts?",
    "What are the practical applications?",
];

/// Generate 4-5 follow-up questions for a conversation. Generation or
/// parse problems degrade to a fixed generic list, never an error.
pub async fn generate_suggestions(
    chat: &dyn ChatModel,
    history: &[ConversationTurn],
) -> Vec<String> {
    let prompt = prompts::render_suggestions(history);
    let response = match chat
        .complete(vec![ChatMessage {
            role: "user".to_string(),
            content: prompt,
        }])
        .await
    {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!("Suggestion generation failed: {e:#}");
            return fallback_suggestions();
        }
    };

    let suggestions = parse_tagged_list(&response, "suggestions");
    if suggestions.is_empty() {
        tracing::warn!("No suggestions parsed from model output, using fallback");
        return fallback_suggestions();
    }
    suggestions
}

fn fallback_suggestions() -> Vec<String> {
    FALLBACK_SUGGESTIONS.iter().map(|s| s.to_string()).collect()
}

/// Extract trimmed, non-empty lines between `<tag>` and `</tag>`.
/// Missing or unterminated tags yield an empty list.
fn parse_tagged_list(content: &str, tag: &str) -> Vec<String> {
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");

    let Some(start) = content.find(&open) else {
        return Vec::new();
    };
    let rest = &content[start + open.len()..];
    let Some(end) = rest.find(&close) else {
        return Vec::new();
    };

    rest[..end]
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}
