//! Client error types.

use pollchat_core::{FailureCause, ReplyDecodeError};
use std::path::PathBuf;

/// Failure of a single request/response exchange.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("server returned HTTP {0}")]
    Status(u16),
    #[error("could not decode reply: {0}")]
    Decode(String),
}

impl TransportError {
    /// Classify for the poll loop: only a timeout is a clean expiry.
    pub fn cause(&self) -> FailureCause {
        match self {
            TransportError::Timeout => FailureCause::Timeout,
            _ => FailureCause::NetworkError,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout
        } else if let Some(status) = e.status() {
            TransportError::Status(status.as_u16())
        } else {
            TransportError::Network(e.to_string())
        }
    }
}

impl From<ReplyDecodeError> for TransportError {
    fn from(e: ReplyDecodeError) -> Self {
        TransportError::Decode(e.to_string())
    }
}

/// Login failed. Never retried automatically.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginError {
    #[error("server rejected login: {message}")]
    Rejected { message: String },
    #[error("server unreachable: {0}")]
    Unreachable(#[source] TransportError),
    #[error("unexpected login reply: {0}")]
    UnexpectedReply(String),
}

/// The session refused to start a poll loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("not logged in")]
    NotLoggedIn,
    #[error("poll loop already running for this session")]
    AlreadyPolling,
}

/// Sending a chat line failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BroadcastError {
    #[error("message is empty")]
    Empty,
    #[error("server rejected message: {message}")]
    Rejected { message: String },
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// [`ChatClient::connect`](crate::ChatClient::connect) failed.
#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Login(#[from] LoginError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Configuration could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
