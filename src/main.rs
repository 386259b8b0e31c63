use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use tracing_subscriber::EnvFilter;

use aisearch::api;
use aisearch::config::Config;
use aisearch::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    tracing::info!("SearXNG endpoint: {}", config.searxng_url);
    tracing::info!(
        "LLM provider: {} ({})",
        config.llm.provider,
        config.llm.base_url
    );

    let state = AppState::new(config.clone())?;

    let app = Router::new()
        .route("/api", get(status))
        .route("/api/images", post(api::images::images))
        .route("/api/suggestions", post(api::suggestions::suggestions))
        .route("/api/videos", post(api::videos::videos))
        .route("/ws", get(api::ws::ws_handler))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

async fn status() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
