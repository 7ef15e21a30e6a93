use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;

use urlchat_backend::config::ChatConfig;
use urlchat_backend::core::logging;
use urlchat_backend::llm::GroqProvider;
use urlchat_backend::server::router::router;
use urlchat_backend::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let log_dir = env::var("URLCHAT_LOG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("logs"));
    logging::init(&log_dir);

    let config = ChatConfig::from_env().context("Invalid configuration")?;
    let api_key = env::var("GROQ_API_KEY").context("GROQ_API_KEY must be set")?;
    let provider = Arc::new(GroqProvider::new(api_key));

    tracing::info!(
        "Starting with model {} (split by {} x {}, top_k {})",
        config.generation_model.model_id(),
        config.chunk_unit.as_str(),
        config.chunk_length,
        config.top_k
    );

    let state = AppState::new(config, provider)?;

    let port = env::var("PORT")
        .ok()
        .and_then(|val| val.parse::<u16>().ok())
        .unwrap_or(8000);
    let bind_addr = format!("127.0.0.1:{}", port);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    let app: Router = router(state);
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
