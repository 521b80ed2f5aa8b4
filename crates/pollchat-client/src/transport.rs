//! Request/response exchanges with the server.

use crate::config::ClientConfig;
use crate::error::{ConfigError, TransportError};
use async_trait::async_trait;
use pollchat_core::{Command, PollReply, PollRequest, Reply};
use reqwest::Url;
use std::time::Duration;

/// One outbound exchange per call; no retries.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Submit a command and return the server's reply.
    async fn command(&self, command: &Command) -> Result<Reply, TransportError>;

    /// Issue one long poll. The server holds it until events are available.
    async fn poll(&self, request: &PollRequest) -> Result<PollReply, TransportError>;
}

/// HTTP transport: form-encoded `POST cmd` and `POST poll`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    cmd_url: Url,
    poll_url: Url,
    command_timeout: Duration,
    poll_timeout: Duration,
}

impl HttpTransport {
    /// Build a transport for the server in `config`.
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let base = config.base_url()?;
        let join = |endpoint: &str| {
            base.join(endpoint)
                .map_err(|e| ConfigError::Invalid(format!("{endpoint} endpoint: {e}")))
        };
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ConfigError::Invalid(format!("http client: {e}")))?;

        Ok(Self {
            client,
            cmd_url: join("cmd")?,
            poll_url: join("poll")?,
            command_timeout: config.command_timeout(),
            poll_timeout: config.poll_timeout(),
        })
    }

    async fn post<T: serde::Serialize + ?Sized>(
        &self,
        url: &Url,
        form: &T,
        timeout: Duration,
    ) -> Result<Vec<u8>, TransportError> {
        let response = self
            .client
            .post(url.clone())
            .form(form)
            .timeout(timeout)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn command(&self, command: &Command) -> Result<Reply, TransportError> {
        tracing::debug!(command = command.name(), "sending command");
        let body = self
            .post(&self.cmd_url, command, self.command_timeout)
            .await?;
        Ok(Reply::decode(&body)?)
    }

    async fn poll(&self, request: &PollRequest) -> Result<PollReply, TransportError> {
        let body = self.post(&self.poll_url, request, self.poll_timeout).await?;
        Ok(PollReply::decode(&body)?)
    }
}
