//! OperAI Assistant Core Domain Types
//!
//! This crate contains pure domain types with no dependencies on:
//! - Network/HTTP
//! - Terminal rendering
//! - Runtime specifics
//!
//! It owns the command/action-result protocol: the conversation state
//! machine, the action results reported by the assistant, and the adapter
//! that turns whatever the server sends back into one normalized shape.

pub mod action;
pub mod chat;
pub mod error;
pub mod ids;
pub mod session;
pub mod wire;

// Re-export commonly used types
pub use action::{ActionResult, ActionStatus, DetailEntry, DetailValue};
pub use chat::{ChatMessage, ChatRole};
pub use error::CoreError;
pub use ids::SessionId;
pub use session::{ChatSession, Resolution, SessionState, FAILURE_NOTICE, FALLBACK_REPLY};
pub use wire::{AssistantReply, ExecuteRequest, HistoryEntry};
