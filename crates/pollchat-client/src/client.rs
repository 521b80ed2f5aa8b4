//! A ready-to-use chat client: login, welcome, poll, broadcast.

use crate::command::CommandSender;
use crate::config::ClientConfig;
use crate::dispatch::{EventDispatcher, Render, SharedRoster, escape_html};
use crate::error::{BroadcastError, ConnectError, LoginError};
use crate::session::SessionManager;
use crate::transport::{HttpTransport, Transport};
use pollchat_core::{PollState, Roster, SessionIdentity};
use std::sync::Arc;
use tokio::sync::watch;

/// A logged-in chat session with its poll loop running.
///
/// Dropping the client stops the poll loop.
pub struct ChatClient {
    sessions: SessionManager,
    identity: Arc<SessionIdentity>,
    commands: CommandSender,
    roster: SharedRoster,
    render: Arc<dyn Render>,
    state: watch::Receiver<PollState>,
}

impl ChatClient {
    /// Connect over HTTP using `config`.
    pub async fn connect(
        config: &ClientConfig,
        render: Arc<dyn Render>,
    ) -> Result<Self, ConnectError> {
        let transport = Arc::new(HttpTransport::new(config)?);
        Self::with_transport(transport, config, render).await
    }

    /// Log in through `transport`, announce the session and start polling.
    pub async fn with_transport(
        transport: Arc<dyn Transport>,
        config: &ClientConfig,
        render: Arc<dyn Render>,
    ) -> Result<Self, ConnectError> {
        let mut sessions =
            SessionManager::new(transport.clone(), config.username.clone(), config.backoff());

        let identity = match sessions.login().await {
            Ok(identity) => identity,
            Err(e) => {
                match &e {
                    LoginError::Rejected { message } => render.render_message(
                        None,
                        &format!("Error logging in: {}", escape_html(message)),
                    ),
                    other => tracing::error!(error = %other, "login error"),
                }
                return Err(e.into());
            }
        };

        render.render_message(
            None,
            &format!(
                "Welcome to the chat, {}",
                escape_html(identity.display_name())
            ),
        );

        let roster = if config.dedup_roster {
            Roster::deduplicating()
        } else {
            Roster::new()
        };
        let dispatcher = EventDispatcher::new(render.clone(), roster);
        let shared_roster = dispatcher.roster();
        let state = sessions.start_polling(dispatcher, render.clone())?;
        let commands = CommandSender::new(transport, identity.client_token().clone());

        Ok(Self {
            sessions,
            identity,
            commands,
            roster: shared_roster,
            render,
            state,
        })
    }

    /// The session established at connect.
    pub fn identity(&self) -> &Arc<SessionIdentity> {
        &self.identity
    }

    /// Snapshot of the participants seen so far.
    pub async fn roster(&self) -> Roster {
        self.roster.read().await.clone()
    }

    /// Current state of the poll loop.
    pub fn poll_state(&self) -> PollState {
        *self.state.borrow()
    }

    /// Whether the poll loop is still running.
    pub fn is_polling(&self) -> bool {
        self.sessions.is_polling()
    }

    /// Send a chat line. Blank input is ignored; failures are also shown on
    /// the render surface.
    pub async fn broadcast(&self, text: &str) -> Result<(), BroadcastError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(BroadcastError::Empty);
        }

        match self.commands.broadcast(text).await {
            Ok(reply) => match reply.error_message() {
                Some(message) => {
                    self.render.render_message(
                        None,
                        &format!("Error sending data to server: {}", escape_html(message)),
                    );
                    Err(BroadcastError::Rejected {
                        message: message.to_string(),
                    })
                }
                None => Ok(()),
            },
            Err(e) => {
                self.render
                    .render_message(None, "Error sending data to server");
                Err(e.into())
            }
        }
    }
}
