//! The focus-mode answer pipeline.
//!
//! One parameterized state machine serves every focus mode:
//! rewrite → fetch → rerank → assemble → synthesize, driven by the
//! [`crate::focus::FocusModeConfig`] table. Stage failures follow a
//! fixed policy: rewrite and synthesis failures kill the turn, a fetch
//! failure degrades to "no sources", a rerank failure degrades to the
//! unranked fetch order.

pub mod context;
pub mod fetch;
pub mod images;
pub mod rerank;
pub mod rewrite;
pub mod suggest;

use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::focus::FocusMode;
use crate::llm::{ChatModel, Embedder};
use crate::models::{ConversationTurn, PipelineEvent, RankedDocument};
use crate::pipeline::rewrite::Rewrite;
use crate::searxng::SearchProvider;

/// No answer token for this long means the model stream stalled.
const STREAM_IDLE_TIMEOUT_SECS: u64 = 120;

/// Shown to the user when a turn dies in a fatal stage; the real error
/// stays in the log.
pub const GENERIC_FAILURE: &str = "An error has occurred please try again later";

/// Event channel depth; the transport drains much faster than the model
/// produces, so this only buffers short bursts.
const EVENT_BUFFER: usize = 32;

/// The retrieval-augmented answer pipeline with injected capabilities.
#[derive(Clone)]
pub struct Pipeline {
    chat: Arc<dyn ChatModel>,
    embedder: Arc<dyn Embedder>,
    search: Arc<dyn SearchProvider>,
}

/// One spawned pipeline turn. Dropping the run aborts the task, so a
/// closed transport cancels in-flight provider calls instead of
/// orphaning a long-running generation.
pub struct PipelineRun {
    pub events: mpsc::Receiver<PipelineEvent>,
    _task: AbortOnDrop,
}

struct AbortOnDrop(JoinHandle<()>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

impl PipelineRun {
    /// Drain the turn to completion for synchronous callers, returning
    /// the sources and the concatenated answer text.
    pub async fn collect(mut self) -> Result<(Vec<RankedDocument>, String), String> {
        let mut sources = Vec::new();
        let mut answer = String::new();
        while let Some(event) = self.events.recv().await {
            match event {
                PipelineEvent::Sources(docs) => sources = docs,
                PipelineEvent::AnswerChunk(chunk) => answer.push_str(&chunk),
                PipelineEvent::Complete => return Ok((sources, answer)),
                PipelineEvent::Failure(reason) => return Err(reason),
            }
        }
        // Channel closed without a terminal event (task aborted)
        Err(GENERIC_FAILURE.to_string())
    }
}

impl Pipeline {
    pub fn new(
        chat: Arc<dyn ChatModel>,
        embedder: Arc<dyn Embedder>,
        search: Arc<dyn SearchProvider>,
    ) -> Self {
        Self {
            chat,
            embedder,
            search,
        }
    }

    /// Spawn one turn. Events arrive in a fixed order: one `Sources`,
    /// zero or more `AnswerChunk`s, then exactly one terminal event.
    pub fn spawn(
        &self,
        mode: FocusMode,
        query: String,
        history: Vec<ConversationTurn>,
    ) -> PipelineRun {
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        let pipeline = self.clone();
        let task = tokio::spawn(async move {
            pipeline.run(mode, query, history, tx).await;
        });
        PipelineRun {
            events: rx,
            _task: AbortOnDrop(task),
        }
    }

    async fn run(
        &self,
        mode: FocusMode,
        query: String,
        history: Vec<ConversationTurn>,
        tx: mpsc::Sender<PipelineEvent>,
    ) {
        let config = mode.config();

        // ── Rewrite, fetch, rerank ────────────────────────
        let sources = match (config.skip_search, config.rewrite_prompt) {
            (true, _) | (_, None) => Vec::new(),
            (false, Some(template)) => {
                match rewrite::rewrite_query(self.chat.as_ref(), template, &history, &query).await
                {
                    Ok(Rewrite::NoSearchNeeded) => Vec::new(),
                    Ok(Rewrite::Query(search_query)) => {
                        let docs =
                            fetch::fetch_documents(self.search.as_ref(), config, &search_query)
                                .await;
                        tracing::debug!(
                            "{} mode fetched {} documents for {search_query:?}",
                            mode.as_str(),
                            docs.len()
                        );
                        rerank::rerank_documents(
                            self.embedder.as_ref(),
                            config,
                            &search_query,
                            docs,
                        )
                        .await
                    }
                    Err(e) => {
                        tracing::error!("Query rewrite failed in {} mode: {e:#}", mode.as_str());
                        let _ = tx
                            .send(PipelineEvent::Failure(GENERIC_FAILURE.to_string()))
                            .await;
                        return;
                    }
                }
            }
        };

        // ── Assemble and announce sources ─────────────────
        let context_block = context::build_context_block(&sources);
        if tx.send(PipelineEvent::Sources(sources)).await.is_err() {
            return; // client went away
        }

        // ── Synthesize ────────────────────────────────────
        let messages =
            context::build_messages(config.answer_prompt, &context_block, &history, &query);
        let mut stream = match self.chat.stream(messages).await {
            Ok(stream) => stream,
            Err(e) => {
                tracing::error!(
                    "Answer stream failed to start in {} mode: {e:#}",
                    mode.as_str()
                );
                let _ = tx
                    .send(PipelineEvent::Failure(GENERIC_FAILURE.to_string()))
                    .await;
                return;
            }
        };

        let idle = Duration::from_secs(STREAM_IDLE_TIMEOUT_SECS);
        loop {
            match tokio::time::timeout(idle, stream.next()).await {
                Ok(Some(Ok(chunk))) => {
                    if tx.send(PipelineEvent::AnswerChunk(chunk)).await.is_err() {
                        return;
                    }
                }
                Ok(Some(Err(e))) => {
                    tracing::error!("Model stream error in {} mode: {e:#}", mode.as_str());
                    let _ = tx
                        .send(PipelineEvent::Failure(GENERIC_FAILURE.to_string()))
                        .await;
                    return;
                }
                Ok(None) => break,
                Err(_) => {
                    tracing::error!(
                        "Model stream idle for {STREAM_IDLE_TIMEOUT_SECS}s in {} mode",
                        mode.as_str()
                    );
                    let _ = tx
                        .send(PipelineEvent::Failure(GENERIC_FAILURE.to_string()))
                        .await;
                    return;
                }
            }
        }

        let _ = tx.send(PipelineEvent::Complete).await;
    }
}
