//! Grounded prompt assembly.
//!
//! Turns a conversation snapshot, the ranked chunks, and the new question
//! into the message list handed to the generation provider. The system
//! template interpolates the retrieved text ahead of its static instruction
//! tail, so the model sees the page content before being told what to do
//! with it.

use crate::chat::conversation::{ConversationTurn, Role};
use crate::llm::ChatMessage;
use crate::rag::DocumentChunk;

pub const CONTEXT_PLACEHOLDER: &str = "{context}";

pub const SYSTEM_TEMPLATE: &str = "According to the contents of this website:\n{context}\nAnswer the user's question.";

/// Build the generation messages. Pure over its inputs; the history is never
/// mutated.
pub fn build(
    history: &[ConversationTurn],
    chunks: &[DocumentChunk],
    question: &str,
) -> Vec<ChatMessage> {
    let context = chunks
        .iter()
        .map(|c| c.text.trim())
        .collect::<Vec<_>>()
        .join("\n");

    let mut messages = Vec::with_capacity(history.len() + 2);
    let mut rendered_system = false;

    for turn in history {
        if turn.role == Role::System && !rendered_system {
            messages.push(ChatMessage::new(
                "system",
                turn.content.replace(CONTEXT_PLACEHOLDER, &context),
            ));
            rendered_system = true;
        } else {
            messages.push(ChatMessage::new(turn.role.as_str(), turn.content.clone()));
        }
    }

    if !rendered_system {
        let rendered = SYSTEM_TEMPLATE.replace(CONTEXT_PLACEHOLDER, &context);
        messages.insert(0, ChatMessage::new("system", rendered));
    }

    messages.push(ChatMessage::new("user", question));
    messages
}
