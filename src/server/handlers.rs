use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::core::errors::ChatError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct IndexRequest {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub url: String,
    pub question: String,
}

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let reachable = state.chat.provider_reachable().await;
    Json(json!({
        "status": "ok",
        "provider": state.chat.provider_name(),
        "provider_reachable": reachable,
        "indexed_urls": state.chat.indexed_url_count(),
    }))
}

pub async fn index_url(
    State(state): State<AppState>,
    Json(request): Json<IndexRequest>,
) -> Result<Json<Value>, ChatError> {
    let url = validate_url(&request.url)?;
    let chunks = state.chat.index(url).await?;
    Ok(Json(json!({ "status": "ok", "chunks_indexed": chunks })))
}

pub async fn ask(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<Value>, ChatError> {
    let url = validate_url(&request.url)?;
    let question = request.question.trim();
    if question.is_empty() {
        return Err(ChatError::BadRequest("question must not be empty".to_string()));
    }

    let reply = state.chat.ask(url, question).await?;
    Ok(Json(json!({ "reply": reply })))
}

fn validate_url(raw: &str) -> Result<&str, ChatError> {
    let url = raw.trim();
    if url.is_empty() {
        return Err(ChatError::BadRequest("url must not be empty".to_string()));
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ChatError::BadRequest(format!(
            "url must be http(s), got '{}'",
            url
        )));
    }
    Ok(url)
}
