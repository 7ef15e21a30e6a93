use std::sync::Arc;

use crate::chat::UrlChat;
use crate::config::ChatConfig;
use crate::core::errors::ChatError;
use crate::llm::LlmProvider;

#[derive(Clone)]
pub struct AppState {
    pub chat: Arc<UrlChat>,
}

impl AppState {
    pub fn new(config: ChatConfig, provider: Arc<dyn LlmProvider>) -> Result<Self, ChatError> {
        let chat = Arc::new(UrlChat::new(config, provider)?);
        Ok(AppState { chat })
    }
}
