//! Events pushed by the server through the poll endpoint.

use crate::{Participant, PublicId};
use serde::Deserialize;
use serde_json::Value;

/// A decoded server event.
///
/// Decoding never fails: elements this client cannot understand become
/// [`Event::Unrecognized`] or [`Event::Malformed`] so one bad element never
/// costs the rest of the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A chat line from another user (or an echo of our own).
    ChatMessage {
        author: String,
        body: String,
        author_id: Option<PublicId>,
    },
    /// A user joined the room.
    ParticipantJoined(Participant),
    /// A well-formed event of a kind this client does not handle.
    Unrecognized { kind: String },
    /// An element that could not be decoded at all.
    Malformed { kind: Option<String>, reason: String },
}

#[derive(Deserialize)]
struct MessageFields {
    username: String,
    message: String,
    #[serde(default, rename = "publicid")]
    public_id: Option<PublicId>,
}

#[derive(Deserialize)]
struct NewUserFields {
    username: String,
    #[serde(rename = "publicid")]
    public_id: PublicId,
}

impl Event {
    /// Decode one element of a poll reply.
    pub fn from_value(value: Value) -> Self {
        let kind = match value.get("type").and_then(Value::as_str) {
            Some(kind) => kind.to_string(),
            None => {
                return Event::Malformed {
                    kind: None,
                    reason: "missing string `type` field".to_string(),
                };
            }
        };

        match kind.as_str() {
            "message" => match serde_json::from_value::<MessageFields>(value) {
                Ok(m) => Event::ChatMessage {
                    author: m.username,
                    body: m.message,
                    author_id: m.public_id,
                },
                Err(e) => Event::Malformed {
                    kind: Some(kind),
                    reason: e.to_string(),
                },
            },
            "newuser" => match serde_json::from_value::<NewUserFields>(value) {
                Ok(u) => Event::ParticipantJoined(Participant::new(u.public_id, u.username)),
                Err(e) => Event::Malformed {
                    kind: Some(kind),
                    reason: e.to_string(),
                },
            },
            _ => Event::Unrecognized { kind },
        }
    }

    /// The wire `type` tag, when one was present.
    pub fn kind(&self) -> Option<&str> {
        match self {
            Event::ChatMessage { .. } => Some("message"),
            Event::ParticipantJoined(_) => Some("newuser"),
            Event::Unrecognized { kind } => Some(kind),
            Event::Malformed { kind, .. } => kind.as_deref(),
        }
    }
}
