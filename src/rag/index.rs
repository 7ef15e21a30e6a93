//! In-memory chunk index.
//!
//! Holds every ingested chunk keyed by source URL, together with the lexical
//! statistics the ranker needs (per-chunk term frequencies, per-URL document
//! frequencies and token totals). Process lifetime only; grows via ingestion,
//! no deletion.

use std::collections::HashMap;
use std::sync::RwLock;

use serde::Serialize;

use crate::core::errors::ChatError;
use crate::rag::ranker::{self, Bm25Scorer, CorpusStats};

/// One retrieval unit of a source page. Immutable once created; uniqueness
/// is per (source_url, sequence_index).
#[derive(Debug, Clone, Serialize)]
pub struct DocumentChunk {
    pub source_url: String,
    pub sequence_index: usize,
    pub text: String,
}

struct IndexedChunk {
    chunk: DocumentChunk,
    term_counts: HashMap<String, u32>,
    token_len: usize,
}

#[derive(Default)]
struct UrlIndex {
    chunks: Vec<IndexedChunk>,
    doc_freqs: HashMap<String, usize>,
    total_tokens: usize,
}

/// Chunk store with lexical lookup, shared across the engine.
pub struct IndexStore {
    inner: RwLock<HashMap<String, UrlIndex>>,
    scorer: Bm25Scorer,
}

impl IndexStore {
    pub fn new() -> Self {
        IndexStore {
            inner: RwLock::new(HashMap::new()),
            scorer: Bm25Scorer::default(),
        }
    }

    /// Append chunks for `url`, continuing the sequence numbering. Re-adding
    /// an already indexed URL is additive, not an overwrite.
    ///
    /// Returns the number of chunks added.
    pub fn add(&self, url: &str, texts: Vec<String>) -> usize {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        let index = guard.entry(url.to_string()).or_default();
        let added = texts.len();

        for text in texts {
            let sequence_index = index.chunks.len();
            let (term_counts, token_len) = ranker::term_counts(&text);

            for term in term_counts.keys() {
                *index.doc_freqs.entry(term.clone()).or_insert(0) += 1;
            }
            index.total_tokens += token_len;

            index.chunks.push(IndexedChunk {
                chunk: DocumentChunk {
                    source_url: url.to_string(),
                    sequence_index,
                    text,
                },
                term_counts,
                token_len,
            });
        }

        added
    }

    pub fn contains(&self, url: &str) -> bool {
        let guard = self.inner.read().unwrap_or_else(|e| e.into_inner());
        guard.get(url).map(|i| !i.chunks.is_empty()).unwrap_or(false)
    }

    pub fn chunk_count(&self, url: &str) -> usize {
        let guard = self.inner.read().unwrap_or_else(|e| e.into_inner());
        guard.get(url).map(|i| i.chunks.len()).unwrap_or(0)
    }

    pub fn url_count(&self) -> usize {
        let guard = self.inner.read().unwrap_or_else(|e| e.into_inner());
        guard.len()
    }

    /// Rank `url`'s chunks against `query` and return the best `top_k`,
    /// ordered by descending score with ties broken by ascending
    /// sequence index.
    pub fn query(
        &self,
        url: &str,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<DocumentChunk>, ChatError> {
        let guard = self.inner.read().unwrap_or_else(|e| e.into_inner());
        let index = guard
            .get(url)
            .filter(|i| !i.chunks.is_empty())
            .ok_or_else(|| ChatError::NotIndexed(url.to_string()))?;

        let stats = CorpusStats {
            total_docs: index.chunks.len(),
            doc_freqs: &index.doc_freqs,
            avg_doc_len: index.total_tokens as f32 / index.chunks.len() as f32,
        };
        let query_terms = ranker::tokenize_unique(query);

        let mut scored: Vec<(f32, &IndexedChunk)> = index
            .chunks
            .iter()
            .map(|indexed| {
                let score =
                    self.scorer
                        .score(&query_terms, &indexed.term_counts, indexed.token_len, &stats);
                (score, indexed)
            })
            .collect();

        scored.sort_by(|a, b| {
            b.0.partial_cmp(&a.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.1.chunk.sequence_index.cmp(&b.1.chunk.sequence_index))
        });

        Ok(scored
            .into_iter()
            .take(top_k)
            .map(|(_, indexed)| indexed.chunk.clone())
            .collect())
    }
}

impl Default for IndexStore {
    fn default() -> Self {
        Self::new()
    }
}
