use crate::focus::FocusModeConfig;
use crate::llm::Embedder;
use crate::models::{RankedDocument, SearchDocument};
use crate::similarity::cosine_similarity;

/// Score fetched documents against the query and keep the best.
///
/// Documents with empty bodies never reach the embedder, and exactly
/// two embedding requests go out per call (one batch for the bodies,
/// one for the query). An embedding failure degrades to the filtered
/// list in fetch order rather than dropping the turn.
pub async fn rerank_documents(
    embedder: &dyn Embedder,
    config: &FocusModeConfig,
    query: &str,
    docs: Vec<SearchDocument>,
) -> Vec<RankedDocument> {
    if docs.is_empty() {
        return Vec::new();
    }

    let filtered: Vec<SearchDocument> =
        docs.into_iter().filter(|d| !d.body.is_empty()).collect();
    if filtered.is_empty() {
        return Vec::new();
    }

    let bodies: Vec<String> = filtered.iter().map(|d| d.body.clone()).collect();

    let embedded = tokio::try_join!(embedder.embed_batch(&bodies), embedder.embed_single(query));
    let (doc_embeddings, query_embedding) = match embedded {
        Ok(pair) => pair,
        Err(e) => {
            tracing::warn!("Embedding failed, returning unranked results: {e:#}");
            return filtered
                .into_iter()
                .take(config.top_k)
                .map(|document| RankedDocument {
                    document,
                    relevance: 0.0,
                })
                .collect();
        }
    };

    let mut scored: Vec<(f32, SearchDocument)> = filtered
        .into_iter()
        .zip(doc_embeddings)
        .map(|(doc, embedding)| (cosine_similarity(&query_embedding, &embedding), doc))
        .collect();

    // Stable sort; ties keep fetch order
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    scored.retain(|(score, _)| *score > config.similarity_threshold);
    scored.truncate(config.top_k);

    scored
        .into_iter()
        .map(|(relevance, document)| RankedDocument {
            document,
            relevance,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::focus::{FocusMode, FocusModeConfig};
    use crate::prompts;

    /// Embedder backed by a fixed text → vector table, counting requests.
    struct TableEmbedder {
        vectors: HashMap<String, Vec<f32>>,
        requests: AtomicUsize,
    }

    impl TableEmbedder {
        fn new(entries: &[(&str, Vec<f32>)]) -> Self {
            Self {
                vectors: entries
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.clone()))
                    .collect(),
                requests: AtomicUsize::new(0),
            }
        }

        fn request_count(&self) -> usize {
            self.requests.load(Ordering::SeqCst)
        }

        fn lookup(&self, text: &str) -> Vec<f32> {
            self.vectors.get(text).cloned().unwrap_or_else(|| vec![0.0, 0.0])
        }
    }

    #[async_trait]
    impl Embedder for TableEmbedder {
        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            self.requests.fetch_add(1, Ordering::SeqCst);
            Ok(texts.iter().map(|t| self.lookup(t)).collect())
        }

        async fn embed_single(&self, text: &str) -> Result<Vec<f32>> {
            self.requests.fetch_add(1, Ordering::SeqCst);
            Ok(self.lookup(text))
        }
    }

    struct BrokenEmbedder;

    #[async_trait]
    impl Embedder for BrokenEmbedder {
        async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
            anyhow::bail!("embedding provider down")
        }

        async fn embed_single(&self, _text: &str) -> Result<Vec<f32>> {
            anyhow::bail!("embedding provider down")
        }
    }

    fn doc(body: &str) -> SearchDocument {
        SearchDocument {
            title: body.to_string(),
            url: format!("https://example.com/{}", body.replace(' ', "-")),
            body: body.to_string(),
            img_src: None,
            extra: HashMap::new(),
        }
    }

    fn config_with(threshold: f32, top_k: usize) -> FocusModeConfig {
        FocusModeConfig {
            rewrite_prompt: Some(prompts::WEB_REWRITE),
            answer_prompt: prompts::WEB_ANSWER,
            categories: &[],
            engines: &[],
            similarity_threshold: threshold,
            top_k,
            skip_search: false,
        }
    }

    #[tokio::test]
    async fn test_empty_input_makes_no_embedding_calls() {
        let embedder = TableEmbedder::new(&[]);
        let out = rerank_documents(&embedder, FocusMode::WebSearch.config(), "q", vec![]).await;
        assert!(out.is_empty());
        assert_eq!(embedder.request_count(), 0);
    }

    #[tokio::test]
    async fn test_all_bodies_empty_makes_no_embedding_calls() {
        let embedder = TableEmbedder::new(&[]);
        let mut empty = doc("ignored");
        empty.body = String::new();
        let out = rerank_documents(
            &embedder,
            FocusMode::WebSearch.config(),
            "q",
            vec![empty],
        )
        .await;
        assert!(out.is_empty());
        assert_eq!(embedder.request_count(), 0);
    }

    #[tokio::test]
    async fn test_exactly_two_embedding_requests() {
        let embedder = TableEmbedder::new(&[
            ("q", vec![1.0, 0.0]),
            ("a", vec![1.0, 0.0]),
            ("b", vec![0.0, 1.0]),
        ]);
        let config = config_with(0.0, 10);
        rerank_documents(&embedder, &config, "q", vec![doc("a"), doc("b")]).await;
        assert_eq!(embedder.request_count(), 2);
    }

    #[tokio::test]
    async fn test_sorts_descending_by_relevance() {
        // Angles from the query vector give similarities 0.6, 1.0, 0.8
        let embedder = TableEmbedder::new(&[
            ("q", vec![1.0, 0.0]),
            ("low", vec![3.0, 4.0]),
            ("best", vec![2.0, 0.0]),
            ("mid", vec![4.0, 3.0]),
        ]);
        let config = config_with(0.1, 10);
        let out = rerank_documents(
            &embedder,
            &config,
            "q",
            vec![doc("low"), doc("best"), doc("mid")],
        )
        .await;
        let bodies: Vec<&str> = out.iter().map(|d| d.document.body.as_str()).collect();
        assert_eq!(bodies, vec!["best", "mid", "low"]);
        assert!(out[0].relevance > out[1].relevance);
        assert!(out[1].relevance > out[2].relevance);
    }

    #[tokio::test]
    async fn test_score_at_threshold_is_dropped() {
        // Identical vectors score exactly 1.0, which is not above 1.0
        let embedder = TableEmbedder::new(&[("q", vec![1.0, 0.0]), ("same", vec![1.0, 0.0])]);
        let config = config_with(1.0, 10);
        let out = rerank_documents(&embedder, &config, "q", vec![doc("same")]).await;
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_scores_below_threshold_are_dropped() {
        let embedder = TableEmbedder::new(&[
            ("q", vec![1.0, 0.0]),
            ("relevant", vec![1.0, 0.0]),
            ("orthogonal", vec![0.0, 1.0]),
        ]);
        let config = config_with(0.5, 10);
        let out = rerank_documents(
            &embedder,
            &config,
            "q",
            vec![doc("orthogonal"), doc("relevant")],
        )
        .await;
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].document.body, "relevant");
        assert_eq!(out[0].relevance, 1.0);
    }

    #[tokio::test]
    async fn test_truncates_to_top_k() {
        let embedder = TableEmbedder::new(&[
            ("q", vec![1.0, 0.0]),
            ("a", vec![1.0, 0.0]),
            ("b", vec![1.0, 0.1]),
            ("c", vec![1.0, 0.2]),
        ]);
        let config = config_with(0.1, 2);
        let out =
            rerank_documents(&embedder, &config, "q", vec![doc("a"), doc("b"), doc("c")]).await;
        assert_eq!(out.len(), 2);
    }

    #[tokio::test]
    async fn test_ties_keep_fetch_order() {
        let embedder = TableEmbedder::new(&[
            ("q", vec![1.0, 0.0]),
            ("first", vec![2.0, 0.0]),
            ("second", vec![3.0, 0.0]),
        ]);
        let config = config_with(0.1, 10);
        let out =
            rerank_documents(&embedder, &config, "q", vec![doc("first"), doc("second")]).await;
        assert_eq!(out[0].document.body, "first");
        assert_eq!(out[1].document.body, "second");
    }

    #[tokio::test]
    async fn test_embedding_failure_falls_back_unranked() {
        let config = config_with(0.5, 2);
        let mut empty = doc("dropped");
        empty.body = String::new();
        let out = rerank_documents(
            &BrokenEmbedder,
            &config,
            "q",
            vec![doc("a"), empty, doc("b"), doc("c")],
        )
        .await;
        // Fetch order preserved, empty body still filtered, capped at top_k
        let bodies: Vec<&str> = out.iter().map(|d| d.document.body.as_str()).collect();
        assert_eq!(bodies, vec!["a", "b"]);
        assert!(out.iter().all(|d| d.relevance == 0.0));
    }
}
