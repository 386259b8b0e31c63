use crate::focus::FocusModeConfig;
use crate::models::SearchDocument;
use crate::searxng::{SearchParams, SearchProvider};

/// Run the aggregator query for one turn. Provider flakiness is common
/// and not user-actionable, so any error degrades to an empty list
/// instead of failing the turn.
pub async fn fetch_documents(
    search: &dyn SearchProvider,
    config: &FocusModeConfig,
    query: &str,
) -> Vec<SearchDocument> {
    let params = SearchParams {
        categories: config.categories,
        engines: config.engines,
    };

    match search.search(query, params).await {
        Ok(found) => found.results,
        Err(e) => {
            tracing::warn!("Search fetch failed: {e:#}");
            Vec::new()
        }
    }
}
