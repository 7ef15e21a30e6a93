//! Retrieval-augmented chat over the contents of a web page.
//!
//! `index` a URL to fetch its content and split it into ranked-searchable
//! chunks; `ask` questions about it and get replies grounded in the best
//! matching chunks, with per-URL conversation history carried across turns.

pub mod chat;
pub mod config;
pub mod core;
pub mod fetch;
pub mod llm;
pub mod rag;
pub mod server;
pub mod state;

pub use crate::chat::{ConversationTurn, Role, UrlChat};
pub use crate::config::{ChatConfig, GenerationModel};
pub use crate::core::errors::ChatError;
pub use crate::llm::{GroqProvider, LlmProvider};
pub use crate::rag::{DocumentChunk, SplitUnit};
