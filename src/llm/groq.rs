//! Groq chat-completions client (OpenAI-compatible API).

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::provider::LlmProvider;
use super::types::ChatRequest;
use crate::core::errors::ChatError;

const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

#[derive(Clone)]
pub struct GroqProvider {
    base_url: String,
    api_key: String,
    client: Client,
}

impl GroqProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, GROQ_BASE_URL.to_string())
    }

    /// Point the client at a different OpenAI-compatible endpoint. Used by
    /// tests to target a mock server.
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl LlmProvider for GroqProvider {
    fn name(&self) -> &str {
        "groq"
    }

    async fn health_check(&self) -> Result<bool, ChatError> {
        let url = format!("{}/models", self.base_url);
        let res = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await;
        match res {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    async fn chat(&self, request: ChatRequest, model_id: &str) -> Result<String, ChatError> {
        let url = format!("{}/chat/completions", self.base_url);

        let mut body = json!({
            "model": model_id,
            "messages": request.messages,
            "stream": false,
            });

        if let Some(obj) = body.as_object_mut() {
            if let Some(t) = request.temperature {
                obj.insert("temperature".to_string(), json!(t));
            }
            if let Some(t) = request.max_tokens {
                obj.insert("max_tokens".to_string(), json!(t));
            }
            if let Some(s) = request.stop {
                obj.insert("stop".to_string(), json!(s));
            }
        }

        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(ChatError::generation)?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(ChatError::GenerationFailure(format!(
                "groq returned {}: {}",
                status, text
            )));
        }

        let payload: Value = res.json().await.map_err(ChatError::generation)?;

        let content = payload["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                ChatError::GenerationFailure("malformed completion response".to_string())
            })?
            .to_string();

        Ok(content)
    }
}
