//! Ordered list of known participants.

use crate::{Participant, PublicId};

/// Participants in join order.
///
/// Append-only. With dedup enabled a second join for the same public id is
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    participants: Vec<Participant>,
    dedup: bool,
}

impl Roster {
    /// An empty roster that keeps every join.
    pub fn new() -> Self {
        Self::default()
    }

    /// A roster that ignores repeated joins of the same public id.
    pub fn deduplicating() -> Self {
        Self {
            participants: Vec::new(),
            dedup: true,
        }
    }

    /// Append a participant. Returns false if it was dropped as a duplicate.
    pub fn push(&mut self, participant: Participant) -> bool {
        if self.dedup && self.contains(&participant.public_id) {
            return false;
        }
        self.participants.push(participant);
        true
    }

    /// Whether a participant with `public_id` has joined.
    pub fn contains(&self, public_id: &PublicId) -> bool {
        self.participants.iter().any(|p| &p.public_id == public_id)
    }

    /// Participants in join order.
    pub fn iter(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter()
    }

    /// Number of recorded joins.
    pub fn len(&self) -> usize {
        self.participants.len()
    }

    /// True if nobody has joined yet.
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Participants in join order, as a slice.
    pub fn as_slice(&self) -> &[Participant] {
        &self.participants
    }
}
