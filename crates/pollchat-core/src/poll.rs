//! Poll replies and outcomes.

use crate::{Event, Reply, ReplyDecodeError, Status};
use serde_json::Value;

/// A poll request that completed with a server response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollReply {
    /// Events in the order the server sent them.
    Events(Vec<Event>),
    /// The server answered with `status: error`.
    Error { message: String },
}

impl PollReply {
    /// Decode a poll response body.
    ///
    /// An array is a batch of events. A `status` object is either an error or
    /// an empty batch. Anything else is rejected.
    pub fn decode(body: &[u8]) -> Result<Self, ReplyDecodeError> {
        let value: Value = serde_json::from_slice(body)?;
        match value {
            Value::Array(items) => Ok(PollReply::Events(
                items.into_iter().map(Event::from_value).collect(),
            )),
            Value::Object(_) => match serde_json::from_value::<Reply>(value)? {
                Reply::Status {
                    status: Status::Error,
                    message,
                } => Ok(PollReply::Error { message }),
                Reply::Status { .. } => Ok(PollReply::Events(Vec::new())),
                other => Err(ReplyDecodeError::UnexpectedShape(format!(
                    "expected event array, got {other:?}"
                ))),
            },
            other => Err(ReplyDecodeError::UnexpectedShape(format!(
                "expected event array, got {other}"
            ))),
        }
    }
}

/// Why a poll produced no server response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCause {
    /// The request expired or was aborted; expected in long polling.
    Timeout,
    /// Network or protocol breakage.
    NetworkError,
}

/// Result of one poll cycle, consumed once by the poll loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Events(Vec<Event>),
    ServerReportedError { message: String },
    TransientFailure { cause: FailureCause },
}

impl From<PollReply> for PollOutcome {
    fn from(reply: PollReply) -> Self {
        match reply {
            PollReply::Events(events) => PollOutcome::Events(events),
            PollReply::Error { message } => PollOutcome::ServerReportedError { message },
        }
    }
}
