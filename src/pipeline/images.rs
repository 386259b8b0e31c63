use anyhow::Result;

use crate::llm::ChatModel;
use crate::models::{ConversationTurn, ImageResult, SearchDocument};
use crate::pipeline::rewrite;
use crate::prompts;
use crate::searxng::{SearchParams, SearchProvider};

const MAX_IMAGE_RESULTS: usize = 10;

const IMAGE_SEARCH_PARAMS: SearchParams = SearchParams {
    categories: &["images"],
    engines: &["bing_images", "google_images"],
};

/// Rephrase the query for image search and return matching images.
///
/// No sentinel branch and no synthesis stage here; errors surface to
/// the HTTP handler instead of degrading.
pub async fn search_images(
    chat: &dyn ChatModel,
    search: &dyn SearchProvider,
    history: &[ConversationTurn],
    query: &str,
) -> Result<Vec<ImageResult>> {
    let rephrased = rewrite::rephrase(chat, prompts::IMAGE_REWRITE, history, query).await?;
    let found = search.search(&rephrased, IMAGE_SEARCH_PARAMS).await?;
    Ok(collect_images(found.results))
}

/// Keep only results that can actually render as an image card.
fn collect_images(results: Vec<SearchDocument>) -> Vec<ImageResult> {
    results
        .into_iter()
        .filter_map(|doc| {
            let img_src = doc.img_src?;
            if doc.title.is_empty() || doc.url.is_empty() {
                return None;
            }
            Some(ImageResult {
                title: doc.title,
                url: doc.url,
                img_src,
            })
        })
        .take(MAX_IMAGE_RESULTS)
        .collect()
}
