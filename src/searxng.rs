use std::collections::HashMap;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use crate::models::SearchDocument;

/// All queries go out with this result language.
const SEARCH_LANGUAGE: &str = "en";

/// Category/engine allowlists taken from the focus-mode table.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchParams {
    pub categories: &'static [&'static str],
    pub engines: &'static [&'static str],
}

/// Aggregator reply: normalized result documents plus any query
/// suggestions the engines returned.
#[derive(Debug, Clone, Default)]
pub struct SearchResults {
    pub results: Vec<SearchDocument>,
    pub suggestions: Vec<String>,
}

/// External metasearch capability.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str, params: SearchParams) -> Result<SearchResults>;
}

/// Client for a SearxNG-compatible JSON API.
#[derive(Clone)]
pub struct SearxngClient {
    http: reqwest::Client,
    base_url: String,
}

impl SearxngClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl SearchProvider for SearxngClient {
    async fn search(&self, query: &str, params: SearchParams) -> Result<SearchResults> {
        let url = format!("{}/search", self.base_url);

        let mut query_params: Vec<(&str, String)> = vec![
            ("format", "json".to_string()),
            ("q", query.to_string()),
            ("language", SEARCH_LANGUAGE.to_string()),
        ];
        if !params.categories.is_empty() {
            query_params.push(("categories", params.categories.join(",")));
        }
        if !params.engines.is_empty() {
            query_params.push(("engines", params.engines.join(",")));
        }

        let resp = self
            .http
            .get(&url)
            .query(&query_params)
            .send()
            .await
            .context("Failed to reach the search aggregator")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Search API returned {status}: {body}");
        }

        let body: SearxngResponse = resp
            .json()
            .await
            .context("Failed to parse search response")?;

        Ok(normalize_response(body))
    }
}

// ─── Response normalization ──────────────────────────────

#[derive(Deserialize)]
struct SearxngResponse {
    #[serde(default)]
    results: Vec<SearxngResult>,
    #[serde(default)]
    suggestions: Vec<String>,
}

/// Raw result shape; engines populate wildly different subsets of it.
#[derive(Deserialize)]
struct SearxngResult {
    title: Option<String>,
    url: Option<String>,
    content: Option<String>,
    img_src: Option<String>,
    thumbnail: Option<String>,
    author: Option<String>,
}

fn normalize_response(resp: SearxngResponse) -> SearchResults {
    SearchResults {
        results: resp.results.into_iter().filter_map(normalize_result).collect(),
        suggestions: resp.suggestions,
    }
}

/// Flatten one raw result into a `SearchDocument`. Results carrying
/// neither title nor url are unusable as citations and are dropped;
/// `body` falls back from content to title to empty.
fn normalize_result(raw: SearxngResult) -> Option<SearchDocument> {
    if raw.title.is_none() && raw.url.is_none() {
        return None;
    }

    let title = raw.title.unwrap_or_default();
    let body = match raw.content {
        Some(content) if !content.is_empty() => content,
        _ => title.clone(),
    };

    let mut extra = HashMap::new();
    if let Some(author) = raw.author {
        extra.insert("author".to_string(), author);
    }
    if let Some(thumbnail) = raw.thumbnail {
        extra.insert("thumbnail".to_string(), thumbnail);
    }

    Some(SearchDocument {
        title,
        url: raw.url.unwrap_or_default(),
        body,
        img_src: raw.img_src,
        extra,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> SearchResults {
        normalize_response(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn test_normalize_full_result() {
        let results = parse(
            r#"{"results":[{"title":"Rust","url":"https://rust-lang.org","content":"A language"}]}"#,
        );
        assert_eq!(results.results.len(), 1);
        let doc = &results.results[0];
        assert_eq!(doc.title, "Rust");
        assert_eq!(doc.url, "https://rust-lang.org");
        assert_eq!(doc.body, "A language");
    }

    #[test]
    fn test_body_falls_back_to_title() {
        let results = parse(r#"{"results":[{"title":"Rust","url":"https://rust-lang.org"}]}"#);
        assert_eq!(results.results[0].body, "Rust");
    }

    #[test]
    fn test_empty_content_falls_back_to_title() {
        let results =
            parse(r#"{"results":[{"title":"Rust","url":"https://rust-lang.org","content":""}]}"#);
        assert_eq!(results.results[0].body, "Rust");
    }

    #[test]
    fn test_drops_result_missing_title_and_url() {
        let results = parse(
            r#"{"results":[{"content":"orphan snippet"},{"title":"Kept","url":"https://kept.example"}]}"#,
        );
        assert_eq!(results.results.len(), 1);
        assert_eq!(results.results[0].title, "Kept");
    }

    #[test]
    fn test_keeps_result_with_url_only() {
        let results = parse(r#"{"results":[{"url":"https://untitled.example"}]}"#);
        assert_eq!(results.results.len(), 1);
        assert_eq!(results.results[0].title, "");
        assert_eq!(results.results[0].body, "");
    }

    #[test]
    fn test_extra_captures_author_and_thumbnail() {
        let results = parse(
            r#"{"results":[{"title":"Video","url":"https://yt.example","author":"someone","thumbnail":"https://thumb.example/1.jpg","img_src":"https://img.example/1.jpg"}]}"#,
        );
        let doc = &results.results[0];
        assert_eq!(doc.extra.get("author").map(String::as_str), Some("someone"));
        assert_eq!(
            doc.extra.get("thumbnail").map(String::as_str),
            Some("https://thumb.example/1.jpg")
        );
        assert_eq!(doc.img_src.as_deref(), Some("https://img.example/1.jpg"));
    }

    #[test]
    fn test_missing_results_array_yields_empty() {
        let results = parse(r#"{"suggestions":["rust lang"]}"#);
        assert!(results.results.is_empty());
        assert_eq!(results.suggestions, vec!["rust lang".to_string()]);
    }
}
