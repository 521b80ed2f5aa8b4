//! Command channel messages.
//!
//! Commands are posted as form fields (`command`, `id`, ...). Replies come
//! back as JSON objects tagged by `type`.

use crate::{ClientToken, PublicId};
use serde::{Deserialize, Serialize};

/// Commands sent from client to server on the command endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    /// Open a session for `id`.
    Login {
        id: ClientToken,
        /// Requested display name; the server picks a guest name when absent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        username: Option<String>,
    },
    /// Send a chat line to everyone in the room.
    Broadcast { id: ClientToken, message: String },
}

impl Command {
    /// Wire name of the command.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Login { .. } => "login",
            Command::Broadcast { .. } => "broadcast",
        }
    }

    /// The session token this command is sent under.
    pub fn client_token(&self) -> &ClientToken {
        match self {
            Command::Login { id, .. } | Command::Broadcast { id, .. } => id,
        }
    }

    /// Replace the session token, keeping the payload.
    pub fn with_client_token(mut self, token: ClientToken) -> Self {
        match &mut self {
            Command::Login { id, .. } | Command::Broadcast { id, .. } => *id = token,
        }
        self
    }
}

/// Body of a poll request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollRequest {
    pub id: ClientToken,
}

/// Status carried by a `status` reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    Error,
    #[serde(other)]
    Other,
}

/// Replies to commands (and non-event poll replies).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Reply {
    /// Generic status; `status: error` is an application-level failure.
    Status {
        status: Status,
        #[serde(default)]
        message: String,
    },
    /// Successful login.
    #[serde(rename = "loginresponse")]
    LoginResponse {
        #[serde(rename = "publicid")]
        public_id: PublicId,
        username: String,
    },
    /// Any reply type this client does not model.
    #[serde(other)]
    Other,
}

impl Reply {
    /// Decode a reply body.
    pub fn decode(body: &[u8]) -> Result<Self, ReplyDecodeError> {
        serde_json::from_slice(body).map_err(ReplyDecodeError::Json)
    }

    /// The server's message if this reply reports an application error.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Reply::Status {
                status: Status::Error,
                message,
            } => Some(message),
            _ => None,
        }
    }
}

/// Error decoding a reply body.
#[derive(Debug, thiserror::Error)]
pub enum ReplyDecodeError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unexpected reply shape: {0}")]
    UnexpectedShape(String),
}
