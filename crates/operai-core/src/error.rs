//! Core domain errors.

use thiserror::Error;

/// Core domain errors for the assistant conversation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// Submitted command was empty after trimming.
    #[error("Command is empty")]
    EmptyCommand,

    /// A command is already awaiting its reply.
    #[error("A request is already in flight")]
    RequestInFlight,

    /// A reply arrived while no command was outstanding.
    #[error("No request is in flight")]
    NoRequestInFlight,
}
