//! Session identity.
//!
//! Two identifiers travel with a session:
//! - [`ClientToken`] - secret, generated by the client before login and sent
//!   with every command and poll
//! - [`PublicId`] - assigned by the server at login and shown to other users

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Client-generated session token.
///
/// 128 random bits rendered as 32 lowercase hex digits. Two tokens generated
/// independently never share a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClientToken(String);

impl ClientToken {
    /// Generate a fresh random token.
    pub fn generate() -> Self {
        Self(format!("{:032x}", rand::random::<u128>()))
    }

    /// The token as sent on the wire.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ClientToken {
    type Err = TokenParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(TokenParseError::Empty);
        }
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for ClientToken {
    type Error = TokenParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ClientToken> for String {
    fn from(token: ClientToken) -> Self {
        token.0
    }
}

/// Error parsing a client token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenParseError {
    #[error("client token cannot be empty")]
    Empty,
}

/// Server-assigned public identifier of a user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicId(String);

impl PublicId {
    /// Wrap a server-assigned id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if the server sent no id.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PublicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A chat participant as announced by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub public_id: PublicId,
    pub display_name: String,
}

impl Participant {
    /// Create a participant.
    pub fn new(public_id: PublicId, display_name: impl Into<String>) -> Self {
        Self {
            public_id,
            display_name: display_name.into(),
        }
    }
}

/// Identity of a logged-in session.
///
/// Only constructible with a non-empty public id, so holding one means login
/// has completed. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    client_token: ClientToken,
    public_id: PublicId,
    display_name: String,
}

impl SessionIdentity {
    /// Create an identity. Fails if `public_id` is empty.
    pub fn new(
        client_token: ClientToken,
        public_id: PublicId,
        display_name: impl Into<String>,
    ) -> Result<Self, SessionIdentityError> {
        if public_id.is_empty() {
            return Err(SessionIdentityError::MissingPublicId);
        }
        Ok(Self {
            client_token,
            public_id,
            display_name: display_name.into(),
        })
    }

    /// The secret token this session sends with every request.
    pub fn client_token(&self) -> &ClientToken {
        &self.client_token
    }

    /// The id other participants see.
    pub fn public_id(&self) -> &PublicId {
        &self.public_id
    }

    /// The name the server assigned.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }
}

/// Error building a session identity.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionIdentityError {
    #[error("server did not assign a public id")]
    MissingPublicId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_tokens_are_hex() {
        let token = ClientToken::generate();
        assert_eq!(token.as_str().len(), 32);
        assert!(token.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn generated_tokens_are_independent() {
        let a = ClientToken::generate();
        let b = ClientToken::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn parse_rejects_empty_token() {
        assert_eq!("".parse::<ClientToken>(), Err(TokenParseError::Empty));
        assert_eq!("  ".parse::<ClientToken>(), Err(TokenParseError::Empty));
        let token: ClientToken = "abc".parse().unwrap();
        assert_eq!(token.to_string(), "abc");
    }

    #[test]
    fn session_requires_public_id() {
        let token = ClientToken::generate();
        let err = SessionIdentity::new(token.clone(), PublicId::new(""), "Guest1").unwrap_err();
        assert_eq!(err, SessionIdentityError::MissingPublicId);

        let session = SessionIdentity::new(token.clone(), PublicId::new("p1"), "Guest1").unwrap();
        assert_eq!(session.client_token(), &token);
        assert_eq!(session.public_id().as_str(), "p1");
        assert_eq!(session.display_name(), "Guest1");
    }
}
