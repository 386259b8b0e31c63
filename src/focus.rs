use crate::prompts;

/// Focus modes selectable by the client. The identifier strings are an
/// external contract and must stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FocusMode {
    WebSearch,
    AcademicSearch,
    VideoSearch,
    RedditSearch,
    PinterestSearch,
    WritingAssistant,
}

/// Per-mode pipeline parameters. All mode-to-mode variation lives in
/// this table; the pipeline state machine itself is mode-independent.
pub struct FocusModeConfig {
    /// Rewrite template; `None` only for modes that never search.
    pub rewrite_prompt: Option<&'static str>,
    pub answer_prompt: &'static str,
    /// Aggregator category allowlist; empty means unrestricted.
    pub categories: &'static [&'static str],
    /// Aggregator engine allowlist; empty means unrestricted.
    pub engines: &'static [&'static str],
    /// Documents scoring at or below this are dropped by the reranker.
    pub similarity_threshold: f32,
    /// Upper bound on documents handed to the context assembler.
    pub top_k: usize,
    /// Skip the rewrite/search/rerank stages entirely.
    pub skip_search: bool,
}

impl FocusMode {
    pub const ALL: [FocusMode; 6] = [
        FocusMode::WebSearch,
        FocusMode::AcademicSearch,
        FocusMode::VideoSearch,
        FocusMode::RedditSearch,
        FocusMode::PinterestSearch,
        FocusMode::WritingAssistant,
    ];

    pub fn parse(s: &str) -> Option<FocusMode> {
        match s {
            "webSearch" => Some(FocusMode::WebSearch),
            "academicSearch" => Some(FocusMode::AcademicSearch),
            "videoSearch" => Some(FocusMode::VideoSearch),
            "redditSearch" => Some(FocusMode::RedditSearch),
            "pinterestSearch" => Some(FocusMode::PinterestSearch),
            "writingAssistant" => Some(FocusMode::WritingAssistant),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FocusMode::WebSearch => "webSearch",
            FocusMode::AcademicSearch => "academicSearch",
            FocusMode::VideoSearch => "videoSearch",
            FocusMode::RedditSearch => "redditSearch",
            FocusMode::PinterestSearch => "pinterestSearch",
            FocusMode::WritingAssistant => "writingAssistant",
        }
    }

    pub fn config(self) -> &'static FocusModeConfig {
        match self {
            FocusMode::WebSearch => &WEB_SEARCH,
            FocusMode::AcademicSearch => &ACADEMIC_SEARCH,
            FocusMode::VideoSearch => &VIDEO_SEARCH,
            FocusMode::RedditSearch => &REDDIT_SEARCH,
            FocusMode::PinterestSearch => &PINTEREST_SEARCH,
            FocusMode::WritingAssistant => &WRITING_ASSISTANT,
        }
    }
}

// Thresholds are lower for modes with sparse or noisy snippets (Reddit,
// Pinterest, video descriptions) and higher for general web results.

static WEB_SEARCH: FocusModeConfig = FocusModeConfig {
    rewrite_prompt: Some(prompts::WEB_REWRITE),
    answer_prompt: prompts::WEB_ANSWER,
    categories: &[],
    engines: &[],
    similarity_threshold: 0.5,
    top_k: 15,
    skip_search: false,
};

static ACADEMIC_SEARCH: FocusModeConfig = FocusModeConfig {
    rewrite_prompt: Some(prompts::ACADEMIC_REWRITE),
    answer_prompt: prompts::ACADEMIC_ANSWER,
    categories: &[],
    engines: &[
        "arxiv",
        "google scholar",
        "internetarchivescholar",
        "pubmed",
        "semantic scholar",
        "crossref",
    ],
    similarity_threshold: 0.3,
    top_k: 15,
    skip_search: false,
};

static VIDEO_SEARCH: FocusModeConfig = FocusModeConfig {
    rewrite_prompt: Some(prompts::VIDEO_REWRITE),
    answer_prompt: prompts::VIDEO_ANSWER,
    categories: &["videos"],
    engines: &["youtube"],
    similarity_threshold: 0.3,
    top_k: 12,
    skip_search: false,
};

static REDDIT_SEARCH: FocusModeConfig = FocusModeConfig {
    rewrite_prompt: Some(prompts::REDDIT_REWRITE),
    answer_prompt: prompts::REDDIT_ANSWER,
    categories: &[],
    engines: &["reddit"],
    similarity_threshold: 0.3,
    top_k: 15,
    skip_search: false,
};

static PINTEREST_SEARCH: FocusModeConfig = FocusModeConfig {
    rewrite_prompt: Some(prompts::PINTEREST_REWRITE),
    answer_prompt: prompts::PINTEREST_ANSWER,
    categories: &["images"],
    engines: &["pinterest"],
    similarity_threshold: 0.3,
    top_k: 15,
    skip_search: false,
};

static WRITING_ASSISTANT: FocusModeConfig = FocusModeConfig {
    rewrite_prompt: None,
    answer_prompt: prompts::WRITING_ASSISTANT,
    categories: &[],
    engines: &[],
    similarity_threshold: 0.0,
    top_k: 0,
    skip_search: true,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_all_modes() {
        for mode in FocusMode::ALL {
            assert_eq!(FocusMode::parse(mode.as_str()), Some(mode));
        }
    }

    #[test]
    fn test_parse_rejects_unknown_mode() {
        assert_eq!(FocusMode::parse("imageSearch"), None);
        assert_eq!(FocusMode::parse(""), None);
        assert_eq!(FocusMode::parse("WebSearch"), None);
    }

    #[test]
    fn test_only_writing_mode_skips_search() {
        for mode in FocusMode::ALL {
            let config = mode.config();
            if mode == FocusMode::WritingAssistant {
                assert!(config.skip_search);
                assert!(config.rewrite_prompt.is_none());
            } else {
                assert!(!config.skip_search);
                assert!(config.rewrite_prompt.is_some());
            }
        }
    }

    #[test]
    fn test_search_modes_have_sane_tuning() {
        for mode in FocusMode::ALL {
            let config = mode.config();
            if config.skip_search {
                continue;
            }
            assert!(config.similarity_threshold > 0.0);
            assert!(config.similarity_threshold < 1.0);
            assert!(config.top_k >= 10 && config.top_k <= 15);
        }
    }

    #[test]
    fn test_web_mode_is_unrestricted() {
        let config = FocusMode::WebSearch.config();
        assert!(config.categories.is_empty());
        assert!(config.engines.is_empty());
        assert_eq!(config.similarity_threshold, 0.5);
    }

    #[test]
    fn test_mode_allowlists() {
        assert!(FocusMode::AcademicSearch.config().engines.contains(&"arxiv"));
        assert_eq!(FocusMode::VideoSearch.config().categories, &["videos"]);
        assert_eq!(FocusMode::VideoSearch.config().engines, &["youtube"]);
        assert_eq!(FocusMode::RedditSearch.config().engines, &["reddit"]);
        assert_eq!(FocusMode::PinterestSearch.config().categories, &["images"]);
        assert_eq!(FocusMode::PinterestSearch.config().engines, &["pinterest"]);
    }

    #[test]
    fn test_video_mode_keeps_fewer_documents() {
        assert_eq!(FocusMode::VideoSearch.config().top_k, 12);
    }
}
