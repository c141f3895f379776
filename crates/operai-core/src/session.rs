//! Conversation state machine.
//!
//! `Idle -> Sending -> Idle`, whether the request succeeds or fails. The
//! message list is append-only and every user message is followed by
//! exactly one assistant message before the next command is accepted.

use std::fmt::Display;

use chrono::{DateTime, Utc};

use crate::chat::ChatMessage;
use crate::error::CoreError;
use crate::ids::SessionId;
use crate::wire::{AssistantReply, ExecuteRequest};

/// Assistant text appended when a request fails.
pub const FALLBACK_REPLY: &str = "Sorry, I encountered an error. Please try again.";

/// Transient notice raised when a request fails.
pub const FAILURE_NOTICE: &str = "Failed to get AI response";

/// Whether a command is awaiting its reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Sending {
        since: DateTime<Utc>,
    },
}

/// How an outstanding request was settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The server replied; the reply was appended.
    Replied { actions: usize, failed: usize },
    /// The request failed; the fallback message was appended.
    Failed { notice: String, cause: String },
}

/// In-memory conversation owned by a single view.
#[derive(Debug, Clone)]
pub struct ChatSession {
    session_id: SessionId,
    messages: Vec<ChatMessage>,
    state: SessionState,
}

impl ChatSession {
    /// Start a conversation with a freshly generated session id.
    pub fn new() -> Self {
        Self::with_id(SessionId::generate())
    }

    /// Start a conversation under a known session id.
    pub fn with_id(session_id: SessionId) -> Self {
        Self {
            session_id,
            messages: Vec::new(),
            state: SessionState::Idle,
        }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// Messages in append order.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.state, SessionState::Sending { .. })
    }

    /// Accept a command.
    ///
    /// Appends the trimmed text as a user message, enters `Sending` and
    /// returns the one request to issue. Empty input and input while busy
    /// are rejected without touching the conversation.
    pub fn submit(&mut self, input: &str) -> Result<ExecuteRequest, CoreError> {
        if self.is_busy() {
            return Err(CoreError::RequestInFlight);
        }
        let text = input.trim();
        if text.is_empty() {
            return Err(CoreError::EmptyCommand);
        }

        self.messages.push(ChatMessage::user(text));
        self.state = SessionState::Sending { since: Utc::now() };

        Ok(ExecuteRequest::new(text, self.session_id.clone()))
    }

    /// Settle the outstanding request.
    ///
    /// Success appends the reply; failure appends [`FALLBACK_REPLY`] with no
    /// actions. Either way the session returns to `Idle`.
    pub fn resolve<E: Display>(
        &mut self,
        outcome: Result<AssistantReply, E>,
    ) -> Result<Resolution, CoreError> {
        if !self.is_busy() {
            return Err(CoreError::NoRequestInFlight);
        }
        self.state = SessionState::Idle;

        let resolution = match outcome {
            Ok(reply) => {
                let resolution = Resolution::Replied {
                    actions: reply.actions.len(),
                    failed: reply.failed_count(),
                };
                self.messages.push(ChatMessage::from_reply(reply));
                resolution
            }
            Err(err) => {
                self.messages.push(ChatMessage::assistant(FALLBACK_REPLY));
                Resolution::Failed {
                    notice: FAILURE_NOTICE.to_string(),
                    cause: err.to_string(),
                }
            }
        };
        Ok(resolution)
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}
