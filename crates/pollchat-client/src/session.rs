//! Session establishment and poll loop ownership.

use crate::command::CommandSender;
use crate::dispatch::{EventDispatcher, Render};
use crate::error::{LoginError, SessionError};
use crate::poll::PollLoop;
use crate::transport::Transport;
use pollchat_core::{ClientToken, PollState, Reply, SessionIdentity};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Owns one session: its identity and at most one running poll loop.
///
/// Logging in again starts a fresh session with a new token and stops any
/// loop running for the previous one, so a running loop always polls with
/// the token of [`identity`].
///
/// [`identity`]: SessionManager::identity
pub struct SessionManager {
    transport: Arc<dyn Transport>,
    username: Option<String>,
    backoff: Duration,
    session: Option<Arc<SessionIdentity>>,
    poll_task: Option<JoinHandle<()>>,
}

impl SessionManager {
    /// Create a manager with no session yet.
    pub fn new(transport: Arc<dyn Transport>, username: Option<String>, backoff: Duration) -> Self {
        Self {
            transport,
            username,
            backoff,
            session: None,
            poll_task: None,
        }
    }

    /// The logged-in identity, if login has completed.
    pub fn identity(&self) -> Option<&Arc<SessionIdentity>> {
        self.session.as_ref()
    }

    /// A command sender bound to this session's token.
    pub fn commands(&self) -> Option<CommandSender> {
        self.session.as_ref().map(|s| {
            CommandSender::new(self.transport.clone(), s.client_token().clone())
        })
    }

    /// Generate a token and log in. Never retried automatically.
    ///
    /// On success the previous session's poll loop, if any, is stopped. A
    /// failed login leaves the current session and its loop untouched.
    pub async fn login(&mut self) -> Result<Arc<SessionIdentity>, LoginError> {
        let token = ClientToken::generate();
        let sender = CommandSender::new(self.transport.clone(), token.clone());

        let reply = sender
            .login(self.username.as_deref())
            .await
            .map_err(LoginError::Unreachable)?;

        match reply {
            Reply::LoginResponse {
                public_id,
                username,
            } => {
                let identity = SessionIdentity::new(token, public_id, username)
                    .map_err(|e| LoginError::UnexpectedReply(e.to_string()))?;
                let identity = Arc::new(identity);
                tracing::info!(
                    public_id = %identity.public_id(),
                    username = identity.display_name(),
                    "logged in"
                );
                self.stop_polling();
                self.session = Some(identity.clone());
                Ok(identity)
            }
            reply => match reply.error_message() {
                Some(message) => {
                    tracing::warn!(reason = message, "login rejected");
                    Err(LoginError::Rejected {
                        message: message.to_string(),
                    })
                }
                None => Err(LoginError::UnexpectedReply(format!("{reply:?}"))),
            },
        }
    }

    /// Spawn the poll loop for the logged-in session.
    pub fn start_polling(
        &mut self,
        dispatcher: EventDispatcher,
        render: Arc<dyn Render>,
    ) -> Result<watch::Receiver<PollState>, SessionError> {
        let session = self.session.clone().ok_or(SessionError::NotLoggedIn)?;
        if self.is_polling() {
            return Err(SessionError::AlreadyPolling);
        }

        let poll_loop = PollLoop::new(
            self.transport.clone(),
            session,
            dispatcher,
            render,
            self.backoff,
        );
        let state = poll_loop.subscribe_state();
        self.poll_task = Some(tokio::spawn(poll_loop.run()));
        Ok(state)
    }

    /// Whether a poll loop is running for the current session.
    pub fn is_polling(&self) -> bool {
        self.poll_task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Abort the running poll loop. No-op when none is running.
    pub fn stop_polling(&mut self) {
        if let Some(task) = self.poll_task.take() {
            task.abort();
        }
    }
}

impl Drop for SessionManager {
    fn drop(&mut self) {
        self.stop_polling();
    }
}
