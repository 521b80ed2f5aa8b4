//! Turning server events into local state changes.

use pollchat_core::{Event, Roster};
use std::sync::Arc;
use tokio::sync::RwLock;

/// The display surface.
///
/// `author` is `None` for system lines. `text` is already escaped.
pub trait Render: Send + Sync {
    fn render_message(&self, author: Option<&str>, text: &str);
}

/// Escape `&`, `>`, `<` and `"` for display in markup.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '>' => out.push_str("&gt;"),
            '<' => out.push_str("&lt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}

/// Roster shared between the poll loop and readers.
pub type SharedRoster = Arc<RwLock<Roster>>;

/// Applies events to the roster and the render surface.
#[derive(Clone)]
pub struct EventDispatcher {
    roster: SharedRoster,
    render: Arc<dyn Render>,
}

impl EventDispatcher {
    /// Create a dispatcher that owns `roster` and draws on `render`.
    pub fn new(render: Arc<dyn Render>, roster: Roster) -> Self {
        Self {
            roster: Arc::new(RwLock::new(roster)),
            render,
        }
    }

    /// Handle to the roster this dispatcher updates.
    pub fn roster(&self) -> SharedRoster {
        self.roster.clone()
    }

    /// Handle one event. Total: unknown or broken events are logged and
    /// otherwise ignored.
    pub async fn dispatch(&self, event: Event) {
        match event {
            Event::ChatMessage { author, body, .. } => {
                self.render
                    .render_message(Some(&escape_html(&author)), &escape_html(&body));
            }
            Event::ParticipantJoined(participant) => {
                let notice = format!("{} joined the chat", escape_html(&participant.display_name));
                let added = self.roster.write().await.push(participant);
                if added {
                    self.render.render_message(None, &notice);
                } else {
                    tracing::debug!("ignoring repeated join");
                }
            }
            Event::Unrecognized { kind } => {
                tracing::warn!(kind = %kind, "unknown message type");
            }
            Event::Malformed { kind, reason } => {
                tracing::warn!(kind = ?kind, reason = %reason, "undecodable event");
            }
        }
    }
}
