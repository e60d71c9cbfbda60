//! Opaque credential types.

use std::fmt;

/// A bearer credential attached to authorized requests.
///
/// # Security
///
/// - Never logged or displayed in Debug output
/// - Treat as opaque; do not parse or inspect
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Create a new access token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the token value for use in authorization headers.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the token holds no characters.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AccessToken").field(&"[REDACTED]").finish()
    }
}

/// A secondary credential used only to mint a new [`AccessToken`].
#[derive(Clone, PartialEq, Eq)]
pub struct RefreshToken(String);

impl RefreshToken {
    /// Create a new refresh token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the token value for use in refresh requests.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for RefreshToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RefreshToken").field(&"[REDACTED]").finish()
    }
}

/// Opaque reference to server-side session state.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionId(String);

impl SessionId {
    /// Create a new session identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SessionId").field(&"[REDACTED]").finish()
    }
}

/// The renewal half of a session: whichever credential the deployment's
/// [`RenewalStrategy`](crate::config::RenewalStrategy) uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenewalCredential {
    /// Refresh token flow.
    Refresh(RefreshToken),
    /// Server-side session flow.
    Session(SessionId),
}

impl RenewalCredential {
    /// Returns the refresh token, if this is the refresh flow.
    pub fn refresh_token(&self) -> Option<&RefreshToken> {
        match self {
            RenewalCredential::Refresh(token) => Some(token),
            RenewalCredential::Session(_) => None,
        }
    }

    /// Returns the session identifier, if this is the session flow.
    pub fn session_id(&self) -> Option<&SessionId> {
        match self {
            RenewalCredential::Session(id) => Some(id),
            RenewalCredential::Refresh(_) => None,
        }
    }

    /// Returns the raw value for persistence.
    pub fn as_str(&self) -> &str {
        match self {
            RenewalCredential::Refresh(token) => token.as_str(),
            RenewalCredential::Session(id) => id.as_str(),
        }
    }
}
