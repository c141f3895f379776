//! Client configuration.

use std::time::Duration;

/// Which assistant endpoint commands are sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssistantMode {
    /// Action execution (`/api/ai/execute`).
    #[default]
    Execute,
    /// Plain conversation without actions (`/api/ai/chat`).
    Chat,
}

impl AssistantMode {
    /// Endpoint path below the server root.
    pub fn path(&self) -> &'static str {
        match self {
            AssistantMode::Execute => "/api/ai/execute",
            AssistantMode::Chat => "/api/ai/chat",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AssistantMode::Execute => "actions",
            AssistantMode::Chat => "chat",
        }
    }
}

/// Assistant client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server root, e.g. `http://localhost:8001`.
    pub base_url: String,

    /// Bearer token sent with every request.
    pub token: Option<String>,

    /// Upper bound on a single request.
    pub timeout: Duration,

    /// Endpoint commands are sent to.
    pub mode: AssistantMode,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8001".to_string(),
            token: None,
            timeout: Duration::from_secs(60),
            mode: AssistantMode::Execute,
        }
    }
}

impl ClientConfig {
    /// Build a configuration for the given server root.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_mode(mut self, mode: AssistantMode) -> Self {
        self.mode = mode;
        self
    }
}
