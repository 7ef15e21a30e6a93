//! Per-URL conversation state.
//!
//! Each URL owns an ordered, append-only sequence of turns, seeded lazily
//! with a single system turn on first use. State lives for the process
//! lifetime only.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::chat::prompt::SYSTEM_TEMPLATE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One message in a conversation. Immutable once appended.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl ConversationTurn {
    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Conversation history for every URL the engine has been asked about.
///
/// The shared state lives in the log itself: `get_or_create` and `turns`
/// return snapshots, and appends are visible to every later call for the
/// same URL. The inner lock is never held across an await point.
#[derive(Default)]
pub struct ConversationLog {
    inner: Mutex<HashMap<String, Vec<ConversationTurn>>>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the URL's history, seeding an unseen URL with exactly one
    /// system turn holding the instruction template.
    pub fn get_or_create(&self, url: &str) -> Vec<ConversationTurn> {
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        guard
            .entry(url.to_string())
            .or_insert_with(|| vec![ConversationTurn::system(SYSTEM_TEMPLATE)])
            .clone()
    }

    /// Append one turn at the end. Existing turns are never reordered or
    /// removed.
    pub fn append(&self, url: &str, turn: ConversationTurn) {
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        guard
            .entry(url.to_string())
            .or_insert_with(|| vec![ConversationTurn::system(SYSTEM_TEMPLATE)])
            .push(turn);
    }

    /// Snapshot of the URL's turns; empty if the URL has never been asked
    /// about.
    pub fn turns(&self, url: &str) -> Vec<ConversationTurn> {
        let guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        guard.get(url).cloned().unwrap_or_default()
    }

    pub fn len(&self, url: &str) -> usize {
        let guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        guard.get(url).map(|t| t.len()).unwrap_or(0)
    }

    pub fn is_empty(&self, url: &str) -> bool {
        self.len(url) == 0
    }
}
