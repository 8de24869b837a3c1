//! Conversation state and the append-only merge applied after each step.

use serde::{Deserialize, Serialize};

use crate::{ChatMessage, Role};

/// Ordered message history of one session.
///
/// Order is chronological and is exactly the context order sent to the model.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConversationState {
    messages: Vec<ChatMessage>,
}

/// Messages produced by a single step, to be appended to the state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateDelta {
    pub messages: Vec<ChatMessage>,
}

impl StateDelta {
    #[must_use]
    pub fn single(message: ChatMessage) -> Self {
        Self {
            messages: vec![message],
        }
    }
}

impl ConversationState {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    #[must_use]
    pub const fn from_messages(messages: Vec<ChatMessage>) -> Self {
        Self { messages }
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    #[must_use]
    pub fn into_messages(self) -> Vec<ChatMessage> {
        self.messages
    }

    /// Concatenate `delta` onto the end of the history.
    ///
    /// Existing entries are never replaced or reordered.
    pub fn merge(&mut self, delta: StateDelta) {
        self.messages.extend(delta.messages);
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    #[must_use]
    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Number of completed user/assistant exchanges.
    #[must_use]
    pub fn turn_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.role() == Role::Assistant)
            .count()
    }
}
