//! Core types for pollchat.
//!
//! This crate provides the protocol primitives shared by clients: session
//! identity, the command channel, server events and poll replies. It performs
//! no I/O.

mod event;
mod identity;
mod message;
mod poll;
mod roster;

pub use event::Event;
pub use identity::{
    ClientToken, Participant, PublicId, SessionIdentity, SessionIdentityError, TokenParseError,
};
pub use message::{Command, PollRequest, Reply, ReplyDecodeError, Status};
pub use poll::{FailureCause, PollOutcome, PollReply};
pub use roster::Roster;

/// Poll loop lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PollState {
    /// Not yet started.
    #[default]
    Idle,
    /// A poll request is in flight.
    Polling,
    /// Handing received events to the dispatcher.
    Dispatching,
    /// Waiting out the retry delay after a failure.
    BackingOff,
}
