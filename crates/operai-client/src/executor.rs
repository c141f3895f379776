//! The seam between the conversation and the network.

use async_trait::async_trait;

use operai_core::{AssistantReply, ExecuteRequest};

use crate::error::ClientError;

/// Sends one command and returns the normalized reply.
///
/// Implemented by [`crate::AssistantClient`] for the real endpoints and by
/// test doubles.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    async fn execute(&self, request: &ExecuteRequest) -> Result<AssistantReply, ClientError>;

    /// Whether the server answers at all. Executors without a server to
    /// check report themselves reachable.
    async fn ping(&self) -> Result<bool, ClientError> {
        Ok(true)
    }
}
