use async_trait::async_trait;

use super::types::ChatRequest;
use crate::core::errors::ChatError;

/// Text-completion capability reached over a network boundary.
///
/// The engine treats generation as opaque: it hands over a message list and
/// a model id and gets back reply text. Failures surface as
/// `ChatError::GenerationFailure`.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name (e.g. "groq").
    fn name(&self) -> &str;

    /// Check whether the provider is reachable.
    async fn health_check(&self) -> Result<bool, ChatError>;

    /// Chat completion (non-streaming).
    async fn chat(&self, request: ChatRequest, model_id: &str) -> Result<String, ChatError>;
}
