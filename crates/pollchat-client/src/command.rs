//! Outgoing commands.

use crate::error::TransportError;
use crate::transport::Transport;
use pollchat_core::{ClientToken, Command, Reply};
use std::sync::Arc;

/// Builds commands stamped with the session token and submits them.
///
/// Fire-once: retry policy belongs to the caller. Application errors come
/// back as an ordinary [`Reply`]; rendering them is the caller's job.
#[derive(Clone)]
pub struct CommandSender {
    transport: Arc<dyn Transport>,
    token: ClientToken,
}

impl CommandSender {
    /// Create a sender for the session identified by `token`.
    pub fn new(transport: Arc<dyn Transport>, token: ClientToken) -> Self {
        Self { transport, token }
    }

    /// The token stamped on every command.
    pub fn client_token(&self) -> &ClientToken {
        &self.token
    }

    /// Submit a command under this session's token.
    ///
    /// Whatever token `command` was built with is replaced.
    pub async fn send(&self, command: Command) -> Result<Reply, TransportError> {
        let command = command.with_client_token(self.token.clone());
        let name = command.name();
        let result = self.transport.command(&command).await;
        if let Err(e) = &result {
            tracing::warn!(command = name, error = %e, "command failed");
        }
        result
    }

    /// Open the session, optionally requesting a display name.
    pub async fn login(&self, username: Option<&str>) -> Result<Reply, TransportError> {
        self.send(Command::Login {
            id: self.token.clone(),
            username: username.map(str::to_string),
        })
        .await
    }

    /// Send a chat line to the room.
    pub async fn broadcast(&self, message: &str) -> Result<Reply, TransportError> {
        self.send(Command::Broadcast {
            id: self.token.clone(),
            message: message.to_string(),
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockTransport;
    use pollchat_core::Status;

    #[tokio::test]
    async fn broadcast_carries_token_and_text() {
        let transport = Arc::new(MockTransport::new());
        transport.push_reply(Ok(Reply::Status {
            status: Status::Ok,
            message: String::new(),
        }));
        let token = ClientToken::generate();
        let sender = CommandSender::new(transport.clone(), token.clone());

        let reply = sender.broadcast("hello").await.unwrap();
        assert_eq!(reply.error_message(), None);
        assert_eq!(
            transport.commands(),
            vec![Command::Broadcast {
                id: token,
                message: "hello".into()
            }]
        );
    }

    #[tokio::test]
    async fn send_stamps_own_token_over_foreign_one() {
        let transport = Arc::new(MockTransport::new());
        transport.push_reply(Ok(Reply::Status {
            status: Status::Ok,
            message: String::new(),
        }));
        let token = ClientToken::generate();
        let sender = CommandSender::new(transport.clone(), token.clone());

        sender
            .send(Command::Broadcast {
                id: ClientToken::generate(),
                message: "hello".into(),
            })
            .await
            .unwrap();

        assert_eq!(
            transport.commands(),
            vec![Command::Broadcast {
                id: token,
                message: "hello".into()
            }]
        );
    }

    #[tokio::test]
    async fn transport_failure_is_returned_not_retried() {
        let transport = Arc::new(MockTransport::new());
        transport.push_reply(Err(TransportError::Network("refused".into())));
        let sender = CommandSender::new(transport.clone(), ClientToken::generate());

        let err = sender.broadcast("hello").await.unwrap_err();
        assert_eq!(err, TransportError::Network("refused".into()));
        assert_eq!(transport.commands().len(), 1);
    }

    #[tokio::test]
    async fn application_error_is_a_reply() {
        let transport = Arc::new(MockTransport::new());
        transport.push_reply(Ok(Reply::Status {
            status: Status::Error,
            message: "user not found: x".into(),
        }));
        let sender = CommandSender::new(transport, ClientToken::generate());

        let reply = sender.login(Some("alice")).await.unwrap();
        assert_eq!(reply.error_message(), Some("user not found: x"));
    }
}
