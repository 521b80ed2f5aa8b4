//! The long-poll loop.
//!
//! One poll is in flight at a time. Each cycle ends in one of three
//! transitions:
//! - events arrived: dispatch them in order, poll again at once
//! - the request timed out: poll again at once, silently
//! - the server reported an error or the network failed: back off, then poll
//!
//! The loop never gives up.

use crate::dispatch::{EventDispatcher, Render, escape_html};
use crate::transport::Transport;
use pollchat_core::{FailureCause, PollOutcome, PollRequest, PollState, SessionIdentity};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

const FAULT_NOTICE: &str = "Error polling server";

/// What the loop does after handling one outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Events were dispatched; poll again immediately.
    DispatchAndContinue,
    /// Clean timeout; poll again immediately.
    RetryImmediately,
    /// Poll again after the delay.
    BackoffThenRetry(Duration),
}

impl Transition {
    /// How long to wait before the next poll.
    pub fn delay(&self) -> Duration {
        match self {
            Transition::BackoffThenRetry(delay) => *delay,
            _ => Duration::ZERO,
        }
    }
}

/// Polls for one session and dispatches what comes back.
pub struct PollLoop {
    transport: Arc<dyn Transport>,
    session: Arc<SessionIdentity>,
    dispatcher: EventDispatcher,
    render: Arc<dyn Render>,
    backoff: Duration,
    /// Set after a fault notice; cleared by the next server response.
    fault_notice_posted: bool,
    state: watch::Sender<PollState>,
}

impl PollLoop {
    /// Create a loop for `session`; nothing is polled until [`run`] or [`step`].
    ///
    /// [`run`]: PollLoop::run
    /// [`step`]: PollLoop::step
    pub fn new(
        transport: Arc<dyn Transport>,
        session: Arc<SessionIdentity>,
        dispatcher: EventDispatcher,
        render: Arc<dyn Render>,
        backoff: Duration,
    ) -> Self {
        let (state, _) = watch::channel(PollState::Idle);
        Self {
            transport,
            session,
            dispatcher,
            render,
            backoff,
            fault_notice_posted: false,
            state,
        }
    }

    /// Observe the loop's state.
    pub fn subscribe_state(&self) -> watch::Receiver<PollState> {
        self.state.subscribe()
    }

    /// Poll forever.
    pub async fn run(mut self) {
        tracing::info!(public_id = %self.session.public_id(), "poll loop started");
        loop {
            let transition = self.step().await;
            let delay = transition.delay();
            if !delay.is_zero() {
                tracing::debug!(?delay, "backing off");
                tokio::time::sleep(delay).await;
            }
        }
    }

    /// Run one cycle: poll, then handle the outcome.
    pub async fn step(&mut self) -> Transition {
        self.state.send_replace(PollState::Polling);
        let outcome = self.poll_once().await;
        self.handle(outcome).await
    }

    async fn poll_once(&self) -> PollOutcome {
        tracing::debug!("longpoll: start");
        let request = PollRequest {
            id: self.session.client_token().clone(),
        };
        match self.transport.poll(&request).await {
            Ok(reply) => reply.into(),
            Err(e) => {
                let cause = e.cause();
                match cause {
                    FailureCause::Timeout => tracing::debug!("longpoll complete"),
                    FailureCause::NetworkError => tracing::warn!(error = %e, "longpoll error"),
                }
                PollOutcome::TransientFailure { cause }
            }
        }
    }

    /// Apply one outcome and pick the next transition.
    pub async fn handle(&mut self, outcome: PollOutcome) -> Transition {
        match outcome {
            PollOutcome::Events(events) => {
                self.fault_notice_posted = false;
                self.state.send_replace(PollState::Dispatching);
                tracing::debug!(count = events.len(), "longpoll: got result");
                for event in events {
                    self.dispatcher.dispatch(event).await;
                }
                Transition::DispatchAndContinue
            }
            PollOutcome::ServerReportedError { message } => {
                self.fault_notice_posted = false;
                tracing::warn!(reason = %message, "longpoll error reported by server");
                self.render.render_message(
                    None,
                    &format!("Long poll error: {}", escape_html(&message)),
                );
                self.back_off()
            }
            PollOutcome::TransientFailure {
                cause: FailureCause::Timeout,
            } => Transition::RetryImmediately,
            PollOutcome::TransientFailure {
                cause: FailureCause::NetworkError,
            } => {
                if !self.fault_notice_posted {
                    self.render.render_message(None, FAULT_NOTICE);
                    self.fault_notice_posted = true;
                }
                self.back_off()
            }
        }
    }

    fn back_off(&self) -> Transition {
        self.state.send_replace(PollState::BackingOff);
        Transition::BackoffThenRetry(self.backoff)
    }
}
