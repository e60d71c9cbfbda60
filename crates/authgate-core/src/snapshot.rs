//! Persisted snapshot of a session.
//!
//! The snapshot is three keys in a [`SessionStorage`]: the access token, the
//! renewal credential (under a key chosen by the [`RenewalStrategy`]), and
//! the JSON-encoded user record.

use tracing::{debug, warn};

use crate::Result;
use crate::config::RenewalStrategy;
use crate::error::StorageError;
use crate::tokens::{AccessToken, RefreshToken, RenewalCredential, SessionId};
use crate::traits::{SessionStorage, StorageOp};
use crate::types::UserRecord;

/// Key holding the access token.
pub const AUTH_TOKEN_KEY: &str = "auth_token";

/// Key holding the refresh token (refresh strategy).
pub const AUTH_REFRESH_TOKEN_KEY: &str = "auth_refresh_token";

/// Key holding the session identifier (session strategy).
pub const AUTH_SESSION_ID_KEY: &str = "auth_session_id";

/// Key holding the JSON user record.
pub const AUTH_USER_KEY: &str = "auth_user";

/// Storage key for the renewal credential of a strategy.
pub fn renewal_key(strategy: RenewalStrategy) -> &'static str {
    match strategy {
        RenewalStrategy::RefreshToken => AUTH_REFRESH_TOKEN_KEY,
        RenewalStrategy::SessionId => AUTH_SESSION_ID_KEY,
    }
}

/// Session fields as stored durably.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub token: Option<AccessToken>,
    pub renewal: Option<RenewalCredential>,
    pub user: Option<UserRecord>,
}

impl Snapshot {
    /// Hydrate a snapshot from storage.
    ///
    /// The renewal credential and user record are only read when a token is
    /// stored. A user record that fails to parse is dropped with a warning
    /// and does not fail hydration.
    ///
    /// # Errors
    ///
    /// Returns an error only if the storage itself cannot be read.
    pub fn load(storage: &dyn SessionStorage, strategy: RenewalStrategy) -> Result<Self> {
        let Some(token) = non_empty(storage.get(AUTH_TOKEN_KEY)?) else {
            debug!("No persisted token");
            return Ok(Self::default());
        };

        let renewal = non_empty(storage.get(renewal_key(strategy))?).map(|value| match strategy {
            RenewalStrategy::RefreshToken => RenewalCredential::Refresh(RefreshToken::new(value)),
            RenewalStrategy::SessionId => RenewalCredential::Session(SessionId::new(value)),
        });

        let user = match non_empty(storage.get(AUTH_USER_KEY)?) {
            Some(raw) => match serde_json::from_str::<UserRecord>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    warn!(error = %e, "Discarding unreadable persisted user record");
                    None
                }
            },
            None => None,
        };

        debug!(
            has_renewal = renewal.is_some(),
            has_user = user.is_some(),
            "Hydrated persisted session"
        );

        Ok(Self {
            token: Some(AccessToken::new(token)),
            renewal,
            user,
        })
    }

    /// Storage batch that makes storage match this snapshot exactly.
    pub fn write_ops(&self, strategy: RenewalStrategy) -> Result<Vec<StorageOp>> {
        let mut ops = Vec::with_capacity(3);

        ops.push(match &self.token {
            Some(token) => StorageOp::set(AUTH_TOKEN_KEY, token.as_str()),
            None => StorageOp::remove(AUTH_TOKEN_KEY),
        });

        ops.push(match &self.renewal {
            Some(renewal) => StorageOp::set(renewal_key(strategy), renewal.as_str()),
            None => StorageOp::remove(renewal_key(strategy)),
        });

        ops.push(match &self.user {
            Some(user) => {
                let json = serde_json::to_string(user).map_err(StorageError::from)?;
                StorageOp::set(AUTH_USER_KEY, json)
            }
            None => StorageOp::remove(AUTH_USER_KEY),
        });

        Ok(ops)
    }

    /// Storage batch removing every snapshot key.
    pub fn clear_ops(strategy: RenewalStrategy) -> Vec<StorageOp> {
        vec![
            StorageOp::remove(AUTH_TOKEN_KEY),
            StorageOp::remove(renewal_key(strategy)),
            StorageOp::remove(AUTH_USER_KEY),
        ]
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
