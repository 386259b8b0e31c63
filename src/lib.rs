//! # aisearch
//!
//! A conversational search assistant: clients send a query, chat
//! history, and a focus mode over WebSocket; the server rephrases the
//! query, fetches results from a SearXNG metasearch instance, reranks
//! them by embedding similarity, and streams back a cited answer.
//!
//! ## Architecture
//!
//! Every focus mode runs the same pipeline with different parameters:
//!
//! ```text
//!                    ┌──────────────────────┐
//!                    │  Query + History      │
//!                    │  + Focus Mode         │
//!                    └──────────┬───────────┘
//!                               │
//!                               ▼
//!                    ┌──────────────────────┐
//!                    │  Query Rewriter (LLM) │──── "not_needed" ──┐
//!                    └──────────┬───────────┘                    │
//!                               │ standalone query               │
//!                               ▼                                │
//!                    ┌──────────────────────┐                    │
//!                    │  SearXNG Fetch        │                    │
//!                    │  (per-mode engines)   │                    │
//!                    └──────────┬───────────┘                    │
//!                               │ documents                      │
//!                               ▼                                │
//!                    ┌──────────────────────┐                    │
//!                    │  Embedding Rerank     │                    │
//!                    │  cosine > threshold   │                    │
//!                    │  keep top-k           │                    │
//!                    └──────────┬───────────┘                    │
//!                               │ ranked sources                 │
//!                               ▼                                ▼
//!                    ┌─────────────────────────────────────────────┐
//!                    │  Context Assembly ("1. <body>" numbering)    │
//!                    └──────────────────────┬──────────────────────┘
//!                                           │
//!                                           ▼
//!                    ┌─────────────────────────────────────────────┐
//!                    │  Answer Synthesis (streamed, [n] citations)  │
//!                    └─────────────────────────────────────────────┘
//! ```
//!
//! Events flow to the client in a fixed order: one `sources` frame,
//! zero or more `message` chunks, then `messageEnd` or `error`.
//!
//! ## Module Overview
//!
//! - [`config`] - Environment-based configuration for server, SearXNG, and LLM settings
//! - [`models`] - Shared data types: conversation turns, documents, pipeline events
//! - [`similarity`] - Cosine similarity scoring over embedding vectors
//! - [`focus`] - The focus mode table: prompts, engine allowlists, rerank tuning
//! - [`prompts`] - Prompt templates and their rendering helpers
//! - [`searxng`] - SearXNG JSON API client and result normalization
//! - [`llm::chat`] - Chat completion and token streaming via Ollama or OpenAI-compatible APIs
//! - [`llm::embeddings`] - Batch embedding generation via Ollama or OpenAI-compatible APIs
//! - [`pipeline`] - The orchestrator plus its stages (rewrite, fetch, rerank, context, images, suggest)
//! - [`api`] - Axum handlers: the WebSocket channel and the sync endpoints
//! - [`state`] - Shared application state holding config and provider clients

pub mod api;
pub mod config;
pub mod focus;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod prompts;
pub mod searxng;
pub mod similarity;
pub mod state;
