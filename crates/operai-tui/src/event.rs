//! Event types for communication between the backend thread and the UI.

use operai_core::{AssistantReply, ExecuteRequest};

/// Reachability of the assistant server.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ServerStatus {
    /// No health check has completed yet.
    #[default]
    Checking,

    /// The server root answered with a 2xx status.
    Reachable,

    /// The last health check failed.
    Unreachable(String),
}

/// Events sent from the backend to the UI thread.
#[derive(Debug)]
pub enum UiEvent {
    /// The outstanding command settled. Errors arrive already rendered to
    /// text; the conversation only needs their description.
    ReplyReceived(Result<AssistantReply, String>),

    /// A health check finished.
    ServerStatusChanged(ServerStatus),
}

/// Commands sent from the UI to the backend.
#[derive(Debug)]
pub enum BackendCommand {
    /// Send one command to the assistant.
    Execute(ExecuteRequest),

    /// Check the server now instead of waiting for the next interval.
    CheckServer,

    /// Shut the backend down.
    Quit,
}
