//! Scripted collaborators for unit tests.

use crate::dispatch::Render;
use crate::error::TransportError;
use crate::transport::Transport;
use async_trait::async_trait;
use pollchat_core::{Command, PollReply, PollRequest, Reply};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::time::Instant;

const POLL_LATENCY: Duration = Duration::from_millis(10);

/// Replays scripted replies and records what was sent.
///
/// Once the poll script runs out, `poll` never completes.
#[derive(Default)]
pub struct MockTransport {
    replies: Mutex<VecDeque<Result<Reply, TransportError>>>,
    polls: Mutex<VecDeque<Result<PollReply, TransportError>>>,
    commands: Mutex<Vec<Command>>,
    poll_requests: Mutex<Vec<PollRequest>>,
    poll_started_at: Mutex<Vec<Instant>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_reply(&self, reply: Result<Reply, TransportError>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn push_poll(&self, reply: Result<PollReply, TransportError>) {
        self.polls.lock().unwrap().push_back(reply);
    }

    pub fn commands(&self) -> Vec<Command> {
        self.commands.lock().unwrap().clone()
    }

    pub fn poll_requests(&self) -> Vec<PollRequest> {
        self.poll_requests.lock().unwrap().clone()
    }

    pub fn poll_started_at(&self) -> Vec<Instant> {
        self.poll_started_at.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn command(&self, command: &Command) -> Result<Reply, TransportError> {
        self.commands.lock().unwrap().push(command.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Network("no scripted reply".into())))
    }

    async fn poll(&self, request: &PollRequest) -> Result<PollReply, TransportError> {
        self.poll_requests.lock().unwrap().push(request.clone());
        self.poll_started_at.lock().unwrap().push(Instant::now());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep(POLL_LATENCY).await;
        let next = self.polls.lock().unwrap().pop_front();
        match next {
            Some(reply) => {
                self.in_flight.fetch_sub(1, Ordering::SeqCst);
                reply
            }
            None => std::future::pending().await,
        }
    }
}

/// Records every rendered line.
#[derive(Default)]
pub struct RecordingRender {
    entries: Mutex<Vec<(Option<String>, String)>>,
}

impl RecordingRender {
    /// Chat lines as `author: text`, system lines as bare text.
    pub fn lines(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .map(|(author, text)| match author {
                Some(author) => format!("{author}: {text}"),
                None => text.clone(),
            })
            .collect()
    }

    pub fn system_lines(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|(author, _)| author.is_none())
            .map(|(_, text)| text.clone())
            .collect()
    }
}

impl Render for RecordingRender {
    fn render_message(&self, author: Option<&str>, text: &str) {
        self.entries
            .lock()
            .unwrap()
            .push((author.map(str::to_string), text.to_string()));
    }
}
