//! Retrieval: chunking, lexical indexing, and BM25 ranking.
//!
//! This module provides:
//! - `chunker`: splits page text into ordered retrieval units
//! - `IndexStore`: per-URL chunk storage with term statistics
//! - `ranker`: BM25 scoring over a URL's chunk collection

pub mod chunker;
pub mod index;
pub mod ranker;

pub use chunker::SplitUnit;
pub use index::{DocumentChunk, IndexStore};
