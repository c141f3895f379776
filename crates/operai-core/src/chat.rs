//! Chat message types for the conversation history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::action::ActionResult;
use crate::wire::AssistantReply;

/// Role of a message in the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// Operator command.
    User,
    /// Assistant reply.
    Assistant,
}

/// A message in the conversation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of this message.
    pub role: ChatRole,
    /// Message content.
    pub content: String,
    /// Actions the assistant reported for this turn (empty for user messages).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<ActionResult>,
    /// When the message was appended.
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
            actions: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    /// Create an assistant message without actions.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
            actions: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    /// Create an assistant message from a normalized reply.
    pub fn from_reply(reply: AssistantReply) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: reply.content,
            actions: reply.actions,
            timestamp: Utc::now(),
        }
    }

    /// Whether this message was sent by the operator.
    pub fn is_user(&self) -> bool {
        self.role == ChatRole::User
    }
}
