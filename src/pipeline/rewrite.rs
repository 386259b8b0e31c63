use anyhow::Result;

use crate::llm::ChatModel;
use crate::models::{ChatMessage, ConversationTurn};
use crate::prompts;

/// Outcome of the query-rewrite stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rewrite {
    /// Standalone search query for the aggregator.
    Query(String),
    /// The model decided this turn needs no search.
    NoSearchNeeded,
}

/// Rephrase a follow-up utterance into a standalone query using the
/// given rewrite template. Model failure here is fatal to the turn.
pub async fn rephrase(
    chat: &dyn ChatModel,
    template: &str,
    history: &[ConversationTurn],
    utterance: &str,
) -> Result<String> {
    let prompt = prompts::render_rewrite(template, history, utterance);
    let response = chat
        .complete(vec![ChatMessage {
            role: "user".to_string(),
            content: prompt,
        }])
        .await?;
    Ok(response.trim().to_string())
}

/// Rewrite for the answer pipeline: like [`rephrase`], but the model
/// may answer with the no-search sentinel.
pub async fn rewrite_query(
    chat: &dyn ChatModel,
    template: &str,
    history: &[ConversationTurn],
    utterance: &str,
) -> Result<Rewrite> {
    let output = rephrase(chat, template, history, utterance).await?;
    Ok(parse_rewrite(&output))
}

fn parse_rewrite(output: &str) -> Rewrite {
    if output == prompts::NO_SEARCH_SENTINEL {
        Rewrite::NoSearchNeeded
    } else {
        Rewrite::Query(output.to_string())
    }
}
