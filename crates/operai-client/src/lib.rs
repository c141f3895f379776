//! Client library for the OperAI assistant.
//!
//! Provides the HTTP client for the assistant endpoints, the
//! [`CommandExecutor`] seam the conversation talks through, and the
//! [`Conversation`] driver that bounds every request with a timeout.

pub mod config;
pub mod conversation;
pub mod error;
pub mod executor;
pub mod http;

pub use config::{AssistantMode, ClientConfig};
pub use conversation::{execute_with_timeout, Conversation};
pub use error::ClientError;
pub use executor::CommandExecutor;
pub use http::AssistantClient;
