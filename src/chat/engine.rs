//! The QA engine.
//!
//! Orchestrates ingestion (fetch -> convert -> chunk -> index) and question
//! answering (retrieve -> assemble -> generate -> record). Each URL moves
//! through a two-state lifecycle, unindexed then indexed, and never back.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::chat::conversation::{ConversationLog, ConversationTurn};
use crate::chat::prompt;
use crate::config::ChatConfig;
use crate::core::errors::ChatError;
use crate::fetch::PageFetcher;
use crate::llm::{ChatRequest, LlmProvider};
use crate::rag::{chunker, IndexStore};

/// One exclusive section per URL.
///
/// `index` and `ask` for the same URL are serialized so a question never
/// observes a half-ingested page and turns are never lost to interleaving;
/// distinct URLs proceed fully concurrently. The registry lock itself is
/// held only long enough to hand out the per-URL mutex.
#[derive(Default)]
struct UrlLocks {
    inner: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl UrlLocks {
    fn acquire(&self, url: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        guard
            .entry(url.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }
}

/// Answers questions about the content of previously indexed web pages.
pub struct UrlChat {
    config: ChatConfig,
    fetcher: PageFetcher,
    index: IndexStore,
    conversations: ConversationLog,
    provider: Arc<dyn LlmProvider>,
    locks: UrlLocks,
}

impl UrlChat {
    /// Build an engine instance. Configuration problems (bad model, zero
    /// lengths) are rejected here, never at call time.
    pub fn new(config: ChatConfig, provider: Arc<dyn LlmProvider>) -> Result<Self, ChatError> {
        config.validate()?;
        let fetcher = PageFetcher::new(config.fetch_timeout())?;
        Ok(Self {
            config,
            fetcher,
            index: IndexStore::new(),
            conversations: ConversationLog::new(),
            provider,
            locks: UrlLocks::default(),
        })
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub async fn provider_reachable(&self) -> bool {
        self.provider.health_check().await.unwrap_or(false)
    }

    pub fn is_indexed(&self, url: &str) -> bool {
        self.index.contains(url)
    }

    pub fn chunk_count(&self, url: &str) -> usize {
        self.index.chunk_count(url)
    }

    pub fn indexed_url_count(&self) -> usize {
        self.index.url_count()
    }

    pub fn conversation(&self, url: &str) -> Vec<ConversationTurn> {
        self.conversations.turns(url)
    }

    /// Fetch `url`, convert it to text, and index its chunks.
    ///
    /// Re-indexing an already indexed URL appends the page's chunks again;
    /// nothing is deduplicated or overwritten.
    pub async fn index(&self, url: &str) -> Result<usize, ChatError> {
        let lock = self.locks.acquire(url);
        let _guard = lock.lock().await;

        let text = self.fetcher.fetch(url).await?;
        let added = self.ingest(url, &text)?;
        tracing::info!("indexed {} ({} chunks)", url, added);
        Ok(added)
    }

    /// Index raw text under `url`, skipping the fetch. Serves direct text
    /// sources and tests.
    pub fn index_text(&self, url: &str, text: &str) -> Result<usize, ChatError> {
        let added = self.ingest(url, text)?;
        tracing::info!("indexed text for {} ({} chunks)", url, added);
        Ok(added)
    }

    fn ingest(&self, url: &str, text: &str) -> Result<usize, ChatError> {
        let chunks = chunker::split(text, self.config.chunk_unit, self.config.chunk_length)?;
        Ok(self.index.add(url, chunks))
    }

    /// Answer `question` from the indexed content of `url`, carrying the
    /// URL's conversation forward.
    ///
    /// A URL that was never indexed is rejected with `NotIndexed` rather
    /// than answered without grounding. On generation failure the already
    /// appended user turn stays in place, so a retry continues the same
    /// conversation.
    pub async fn ask(&self, url: &str, question: &str) -> Result<String, ChatError> {
        let lock = self.locks.acquire(url);
        let _guard = lock.lock().await;

        if !self.index.contains(url) {
            return Err(ChatError::NotIndexed(url.to_string()));
        }

        // Snapshot before appending so the assembler adds the question
        // exactly once.
        let history = self.conversations.get_or_create(url);
        self.conversations.append(url, ConversationTurn::user(question));

        let chunks = self.index.query(url, question, self.config.top_k)?;
        tracing::debug!("retrieved {} chunks for {}", chunks.len(), url);

        let messages = prompt::build(&history, &chunks, question);
        let request = ChatRequest::new(messages);
        let model_id = self.config.generation_model.model_id();

        let reply = match tokio::time::timeout(
            self.config.generation_timeout(),
            self.provider.chat(request, model_id),
        )
        .await
        {
            Ok(result) => result?,
            Err(_) => {
                return Err(ChatError::GenerationFailure(format!(
                    "timed out after {}s",
                    self.config.generation_timeout_secs
                )))
            }
        };

        self.conversations
            .append(url, ConversationTurn::assistant(reply.clone()));
        Ok(reply)
    }
}
