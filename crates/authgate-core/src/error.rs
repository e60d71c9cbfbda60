//! Error types for authgate.
//!
//! This module provides a unified error type with explicit variants for
//! transport, authentication, protocol, storage, and input validation errors.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

/// The unified error type for authgate operations.
///
/// Callers typically only need to distinguish authentication failures (which
/// carry a user-facing message) from everything else.
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors (connection, timeout, malformed HTTP).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Authentication errors (rejected login, failed registration).
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Non-success responses from the backend.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Input validation errors (bad URL, bad route table).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    /// Persisted snapshot could not be read or written.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl Error {
    /// Returns true if this error is a `401 Unauthorized` from the backend.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Error::Protocol(err) if err.is_unauthorized())
    }
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// Response body could not be decoded.
    #[error("malformed response: {message}")]
    Decode { message: String },

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

/// Authentication-related errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The backend rejected the login attempt.
    #[error("{message}")]
    AuthenticationFailed { message: String },

    /// The backend rejected the registration.
    #[error("{message}")]
    RegistrationFailed { message: String },

    /// The user profile could not be loaded.
    #[error("profile fetch failed: {reason}")]
    ProfileFetchFailed { reason: String },

    /// No refresh token is held.
    #[error("no refresh token available")]
    RefreshTokenMissing,

    /// Credential was rejected and could not be renewed.
    #[error("session expired")]
    SessionExpired,
}

/// A non-success response from the backend.
///
/// Bodies follow the Django REST Framework shape: an optional `detail` or
/// `message` string, and per-field arrays of validation messages.
#[derive(Debug, Clone, Default)]
pub struct ProtocolError {
    /// HTTP status code.
    pub status: u16,
    /// `detail` field of the error body.
    pub detail: Option<String>,
    /// `message` field of the error body.
    pub message: Option<String>,
    /// Per-field validation messages.
    pub fields: BTreeMap<String, Vec<String>>,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(summary) = self.summary() {
            write!(f, ": {}", summary)?;
        }
        Ok(())
    }
}

impl std::error::Error for ProtocolError {}

impl ProtocolError {
    /// Create a protocol error carrying only a status code.
    pub fn new(status: u16) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }

    /// Build a protocol error from a JSON error body.
    ///
    /// String `detail`/`message` fields are taken as-is; every other field
    /// holding an array of strings (or a single string) is recorded as a
    /// field error. Anything else is ignored.
    pub fn from_body(status: u16, body: &serde_json::Value) -> Self {
        let mut error = Self::new(status);
        let Some(object) = body.as_object() else {
            return error;
        };

        for (key, value) in object {
            match (key.as_str(), value) {
                ("detail", serde_json::Value::String(s)) => error.detail = Some(s.clone()),
                ("message", serde_json::Value::String(s)) => error.message = Some(s.clone()),
                (_, serde_json::Value::Array(items)) => {
                    let messages: Vec<String> = items
                        .iter()
                        .filter_map(|item| item.as_str().map(str::to_string))
                        .collect();
                    error.fields.insert(key.clone(), messages);
                }
                (_, serde_json::Value::String(s)) => {
                    error.fields.insert(key.clone(), vec![s.clone()]);
                }
                _ => {}
            }
        }

        error
    }

    /// Check if this is an authentication error.
    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    /// Human-readable summary: `detail`, then `message`. Empty strings are skipped.
    pub fn summary(&self) -> Option<&str> {
        [self.detail.as_deref(), self.message.as_deref()]
            .into_iter()
            .flatten()
            .find(|s| !s.is_empty())
    }

    /// First message of the first field in `order` that has one.
    pub fn first_field_error(&self, order: &[&str]) -> Option<&str> {
        order.iter().find_map(|field| {
            self.fields
                .get(*field)
                .and_then(|messages| messages.first())
                .map(String::as_str)
                .filter(|s| !s.is_empty())
        })
    }
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid API base URL.
    #[error("invalid API URL '{value}': {reason}")]
    ApiUrl { value: String, reason: String },

    /// Invalid route table or unknown route.
    #[error("invalid route '{value}': {reason}")]
    Route { value: String, reason: String },

    /// Invalid configuration.
    #[error("invalid config: {reason}")]
    Config { reason: String },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}

/// Errors from the persistence medium.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying I/O failed.
    #[error("I/O error: {message}")]
    Io { message: String },

    /// Stored data could not be (de)serialized.
    #[error("serialization error: {message}")]
    Serialization { message: String },

    /// The storage lock could not be acquired or was poisoned.
    #[error("storage lock unavailable")]
    Lock,
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization {
            message: err.to_string(),
        }
    }
}
