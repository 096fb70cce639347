//! Conversation state held for each running sub-agent.

use serde::{Deserialize, Serialize};
use taskpilot_core::ChatMessage;

/// Active state of one sub-agent conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSession {
    pub task: String,
    pub model: String,
    /// Full conversation transcript, oldest first.
    pub messages: Vec<ChatMessage>,
}

impl AgentSession {
    pub fn new(task: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            model: model.into(),
            messages: Vec::new(),
        }
    }

    /// Append a completed user/assistant exchange.
    pub fn record_exchange(&mut self, user: impl Into<String>, reply: impl Into<String>) {
        self.messages.push(ChatMessage::user(user));
        self.messages.push(ChatMessage::assistant(reply));
    }
}
