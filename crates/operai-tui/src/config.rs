//! Server options shared by every subcommand.

use std::time::Duration;

use clap::Args;

use operai_client::{AssistantMode, ClientConfig, ClientError};

/// Default server root.
pub const DEFAULT_API_URL: &str = "http://localhost:8001";

/// Where and how to reach the assistant server.
#[derive(Args, Debug, Clone)]
pub struct ServerArgs {
    /// Server root (the assistant routes live under /api)
    #[arg(long, env = "OPERAI_API_URL", default_value = DEFAULT_API_URL, global = true)]
    pub api_url: String,

    /// Bearer token sent with every request
    #[arg(long, env = "OPERAI_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    /// Seconds to wait for a reply before giving up
    #[arg(long, env = "OPERAI_TIMEOUT", default_value_t = 60, global = true)]
    pub timeout: u64,
}

impl ServerArgs {
    /// Resolve into a client configuration for `mode`.
    pub fn client_config(&self, mode: AssistantMode) -> Result<ClientConfig, ClientError> {
        if self.timeout == 0 {
            return Err(ClientError::InvalidConfig(
                "timeout must be at least one second".to_string(),
            ));
        }

        let mut config = ClientConfig::new(self.api_url.trim())
            .with_timeout(Duration::from_secs(self.timeout))
            .with_mode(mode);
        if let Some(token) = self.token.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            config = config.with_token(token);
        }
        Ok(config)
    }
}

/// Endpoint selected by the `--plain` flag.
pub fn mode_for(plain: bool) -> AssistantMode {
    if plain {
        AssistantMode::Chat
    } else {
        AssistantMode::Execute
    }
}
