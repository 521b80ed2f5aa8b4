//! Client-side session and long-poll loop for pollchat.
//!
//! [`SessionManager::login`] opens a session; [`PollLoop`] then retrieves
//! events forever and hands them to an [`EventDispatcher`], which updates the
//! roster and calls into a [`Render`] surface. [`CommandSender`] submits
//! commands alongside the loop. [`ChatClient`] wires all of it together.

mod client;
mod command;
mod config;
mod dispatch;
mod error;
mod poll;
mod session;
mod transport;

#[cfg(test)]
mod testing;

pub use client::ChatClient;
pub use command::CommandSender;
pub use config::ClientConfig;
pub use dispatch::{EventDispatcher, Render, SharedRoster, escape_html};
pub use error::{
    BroadcastError, ConfigError, ConnectError, LoginError, SessionError, TransportError,
};
pub use poll::{PollLoop, Transition};
pub use session::SessionManager;
pub use transport::{HttpTransport, Transport};
