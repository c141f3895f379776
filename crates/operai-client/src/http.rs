//! HTTP client for the assistant REST endpoints.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response};
use tracing::{debug, warn};

use operai_core::{AssistantReply, ExecuteRequest, HistoryEntry, SessionId};

use crate::config::{AssistantMode, ClientConfig};
use crate::error::ClientError;
use crate::executor::CommandExecutor;

/// History route below the server root.
const HISTORY_PATH: &str = "/api/ai/history";

/// HTTP client for the assistant endpoints.
pub struct AssistantClient {
    inner: reqwest::Client,
    base_url: String,
    token: Option<String>,
    mode: AssistantMode,
    timeout: Duration,
}

impl AssistantClient {
    /// Create a new client.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ClientError::InvalidConfig(format!(
                "base URL must start with http:// or https://, got '{}'",
                config.base_url
            )));
        }

        let inner = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner,
            base_url,
            token: config.token.clone(),
            mode: config.mode,
            timeout: config.timeout,
        })
    }

    pub fn mode(&self) -> AssistantMode {
        self.mode
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check if the server root answers.
    pub async fn health(&self) -> Result<bool, ClientError> {
        let url = format!("{}/", self.base_url);
        debug!(url = %url, "Checking health");

        let response = self
            .inner
            .get(&url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        Ok(response.status().is_success())
    }

    /// Send one command to the configured assistant endpoint.
    pub async fn send_command(
        &self,
        request: &ExecuteRequest,
    ) -> Result<AssistantReply, ClientError> {
        let url = format!("{}{}", self.base_url, self.mode.path());
        debug!(
            url = %url,
            session_id = %request.session_id,
            "POST command"
        );

        let response = self
            .authorized(self.inner.post(&url).json(request))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        let body = self.success_body(response).await?;

        let reply = AssistantReply::from_body(&body);
        debug!(
            actions = reply.actions.len(),
            failed = reply.failed_count(),
            "Command reply normalized"
        );
        Ok(reply)
    }

    /// Fetch stored turns, newest first, optionally for one session.
    pub async fn history(
        &self,
        session_id: Option<&SessionId>,
    ) -> Result<Vec<HistoryEntry>, ClientError> {
        let url = format!("{}{}", self.base_url, HISTORY_PATH);
        debug!(url = %url, "GET history");

        let mut builder = self.inner.get(&url);
        if let Some(id) = session_id {
            builder = builder.query(&[("session_id", id.as_str())]);
        }

        let response = self
            .authorized(builder)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        let body = self.success_body(response).await?;

        Ok(serde_json::from_str(&body)?)
    }

    /// Read the body of a 2xx response, or turn the status into an error.
    async fn success_body(&self, response: Response) -> Result<String, ClientError> {
        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Assistant endpoint returned an error");
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }

    fn transport_error(&self, err: reqwest::Error) -> ClientError {
        if err.is_timeout() {
            ClientError::Timeout(self.timeout)
        } else if err.is_connect() {
            ClientError::Connection(err.to_string())
        } else {
            ClientError::Http(err)
        }
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

#[async_trait]
impl CommandExecutor for AssistantClient {
    async fn execute(&self, request: &ExecuteRequest) -> Result<AssistantReply, ClientError> {
        self.send_command(request).await
    }

    async fn ping(&self) -> Result<bool, ClientError> {
        self.health().await
    }
}
