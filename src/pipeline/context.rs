use crate::models::{ChatMessage, ConversationTurn, RankedDocument};
use crate::prompts;

/// Render ranked documents into the numbered context block.
///
/// The 1-based position of each line is the citation contract: it is
/// the number the synthesized answer cites as `[n]` and the position
/// the client sees in the sources payload, so input order must never
/// change after this point.
pub fn build_context_block(docs: &[RankedDocument]) -> String {
    docs.iter()
        .enumerate()
        .map(|(i, doc)| format!("{}. {}", i + 1, doc.document.body))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Assemble the chat-API messages for answer synthesis: the rendered
/// answer template as the system message, the conversation as
/// structured turns, then the user query.
pub fn build_messages(
    answer_prompt: &str,
    context: &str,
    history: &[ConversationTurn],
    query: &str,
) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ChatMessage {
        role: "system".to_string(),
        content: prompts::render_answer(answer_prompt, context),
    });
    messages.extend(history.iter().map(|turn| ChatMessage {
        role: turn.role.as_str().to_string(),
        content: turn.content.clone(),
    }));
    messages.push(ChatMessage {
        role: "user".to_string(),
        content: query.to_string(),
    });
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use crate::models::SearchDocument;

    fn ranked(body: &str, relevance: f32) -> RankedDocument {
        RankedDocument {
            document: SearchDocument {
                title: body.to_string(),
                url: "https://example.com".to_string(),
                body: body.to_string(),
                img_src: None,
                extra: HashMap::new(),
            },
            relevance,
        }
    }

    #[test]
    fn test_context_block_numbers_from_one() {
        let docs = vec![ranked("first snippet", 0.9), ranked("second snippet", 0.7)];
        assert_eq!(
            build_context_block(&docs),
            "1. first snippet\n2. second snippet"
        );
    }

    #[test]
    fn test_context_block_preserves_input_order() {
        // Assembly must not reorder, even if relevance looks unsorted
        let docs = vec![ranked("a", 0.1), ranked("b", 0.9)];
        assert_eq!(build_context_block(&docs), "1. a\n2. b");
    }

    #[test]
    fn test_context_block_empty_input() {
        assert_eq!(build_context_block(&[]), "");
    }

    #[test]
    fn test_messages_structure() {
        let history = vec![
            ConversationTurn::user("What is Rust?"),
            ConversationTurn::assistant("A systems language."),
        ];
        let messages = build_messages(
            crate::prompts::WEB_ANSWER,
            "1. Rust is fast",
            &history,
            "Is it memory safe?",
        );
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, "system");
        assert!(messages[0].content.contains("1. Rust is fast"));
        assert_eq!(messages[1].role, "user");
        assert_eq!(messages[1].content, "What is Rust?");
        assert_eq!(messages[2].role, "assistant");
        assert_eq!(messages[3].role, "user");
        assert_eq!(messages[3].content, "Is it memory safe?");
    }

    #[test]
    fn test_messages_no_history() {
        let messages = build_messages(crate::prompts::WEB_ANSWER, "", &[], "hello");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[1].role, "user");
    }
}
