//! Newtype wrapper for the conversation session identifier.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Prefix of every generated session identifier.
const SESSION_PREFIX: &str = "session_";

/// Opaque identifier correlating command/response turns server-side.
///
/// Generated once per client start and sent with every request. The client
/// attaches no meaning to it beyond that.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Create a SessionId from an existing string (e.g. to resume history).
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a new random SessionId.
    pub fn generate() -> Self {
        Self(format!("{}{}", SESSION_PREFIX, Uuid::new_v4().simple()))
    }

    /// Get the inner string reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Short form for logs and the status line.
    pub fn short(&self) -> &str {
        let id = self.0.strip_prefix(SESSION_PREFIX).unwrap_or(&self.0);
        let end = id
            .char_indices()
            .nth(8)
            .map(|(i, _)| i)
            .unwrap_or(id.len());
        &id[..end]
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}
