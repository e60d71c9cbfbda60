//! HTTP-backed session store.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use tracing::{debug, error, info, instrument, warn};

use authgate_core::error::{AuthError, Error, TransportError};
use authgate_core::{
    AccessToken, AuthConfig, AuthSession, Credentials, RefreshToken, Registration,
    RenewalCredential, RenewalStrategy, Result, SessionId, SessionStorage, Snapshot, UserRecord,
};

use crate::backend::{AuthBackend, LOGIN_FAILED};

/// Client-side authentication state for one application.
///
/// A `SessionStore` owns the credential, the renewal credential (refresh
/// token or session id, per [`RenewalStrategy`]), the cached user record, and
/// a loading flag. Every change is mirrored to a [`SessionStorage`] before it
/// becomes visible in memory, so a restart hydrates the same state.
///
/// Handles are cheap to clone and share one state. Operations may overlap;
/// the last write wins.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use authgate_core::{ApiUrl, AuthConfig, Credentials, MemoryStorage};
/// use authgate_http::SessionStore;
///
/// # async fn example() -> Result<(), authgate_core::Error> {
/// let config = AuthConfig::new(ApiUrl::new("https://example.com/api")?);
/// let store = SessionStore::new(config, Arc::new(MemoryStorage::new()))?;
///
/// store.login(&Credentials::new("alice@example.com", "hunter2")).await?;
/// assert!(store.is_authenticated());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    backend: AuthBackend,
    storage: Arc<dyn SessionStorage>,
    state: RwLock<Snapshot>,
    loading: AtomicUsize,
}

/// Holds the loading flag up for as long as it lives.
struct Loading<'a>(&'a AtomicUsize);

impl<'a> Loading<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for Loading<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl SessionStore {
    /// Create a store and hydrate it from `storage`.
    ///
    /// Hydration is best-effort: if the storage cannot be read the store
    /// starts signed out.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: AuthConfig, storage: Arc<dyn SessionStorage>) -> Result<Self> {
        let snapshot = match Snapshot::load(storage.as_ref(), config.renewal) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "Could not read persisted session, starting signed out");
                Snapshot::default()
            }
        };

        let backend = AuthBackend::new(config)?;

        Ok(Self {
            inner: Arc::new(SessionInner {
                backend,
                storage,
                state: RwLock::new(snapshot),
                loading: AtomicUsize::new(0),
            }),
        })
    }

    pub fn config(&self) -> &AuthConfig {
        self.inner.backend.config()
    }

    /// Returns true if a non-empty credential is held.
    pub fn is_authenticated(&self) -> bool {
        self.read_state()
            .token
            .as_ref()
            .is_some_and(|t| !t.is_empty())
    }

    /// Returns true while any operation that sets the flag is in flight.
    ///
    /// Advisory only; it does not serialise operations.
    pub fn is_loading(&self) -> bool {
        self.inner.loading.load(Ordering::SeqCst) > 0
    }

    /// The cached user record.
    pub fn user(&self) -> Option<UserRecord> {
        self.read_state().user.clone()
    }

    /// The current credential.
    pub fn access_token(&self) -> Option<AccessToken> {
        self.read_state().token.clone().filter(|t| !t.is_empty())
    }

    /// The current renewal credential.
    pub fn renewal_credential(&self) -> Option<RenewalCredential> {
        self.read_state().renewal.clone()
    }

    /// Authenticate and establish a session.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::AuthenticationFailed`] if the backend rejects the
    /// credentials, a transport error if it cannot be reached, or a storage
    /// error if the session cannot be persisted (memory is then unchanged).
    #[instrument(skip(self, credentials), fields(identifier = %credentials.identifier()))]
    pub async fn login(&self, credentials: &Credentials) -> Result<()> {
        let _loading = self.loading();
        info!("Logging in");

        let response = self.inner.backend.login(credentials).await.map_err(|e| {
            error!(error = %e, "Login error");
            e
        })?;

        if response.token.is_empty() {
            error!("Login response carried an empty token");
            return Err(AuthError::AuthenticationFailed {
                message: LOGIN_FAILED.to_string(),
            }
            .into());
        }

        let renewal = match self.config().renewal {
            RenewalStrategy::RefreshToken => response
                .refresh
                .filter(|r| !r.is_empty())
                .map(|r| RenewalCredential::Refresh(RefreshToken::new(r))),
            RenewalStrategy::SessionId => response
                .session_id
                .filter(|s| !s.is_empty())
                .map(|s| RenewalCredential::Session(SessionId::new(s))),
        };

        let next = Snapshot {
            token: Some(AccessToken::new(response.token)),
            renewal,
            user: Some(response.user),
        };

        self.commit(|_| Some(next))?;
        debug!("Session established");
        Ok(())
    }

    /// Create an account. Does not sign in.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::RegistrationFailed`] carrying the first field
    /// error the backend reported, or a transport error.
    #[instrument(skip(self, registration), fields(username = %registration.username))]
    pub async fn register(&self, registration: &Registration) -> Result<()> {
        let _loading = self.loading();
        info!("Registering account");

        self.inner.backend.register(registration).await.map_err(|e| {
            error!(error = %e, "Registration error");
            e
        })
    }

    /// End the session.
    ///
    /// The backend is notified best-effort; local state is cleared whatever
    /// the outcome.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        let (token, session_id) = {
            let state = self.read_state();
            (
                state.token.clone().filter(|t| !t.is_empty()),
                state
                    .renewal
                    .as_ref()
                    .and_then(RenewalCredential::session_id)
                    .cloned(),
            )
        };

        if let Some(token) = token {
            if let Err(e) = self.inner.backend.logout(&token, session_id.as_ref()).await {
                warn!(error = %e, "Logout request failed");
            }
        }

        self.clear_auth_data();
        info!("Logged out");
    }

    /// Mint a new credential from the refresh token.
    ///
    /// Returns false without touching state if no refresh token is held, the
    /// backend refuses, or it answers with an empty token. The refresh token
    /// itself is kept.
    #[instrument(skip(self))]
    pub async fn refresh_access_token(&self) -> bool {
        match self.renew().await {
            Ok(true) => true,
            Ok(false) => {
                debug!("Session changed during refresh, discarding new token");
                false
            }
            Err(e @ Error::Auth(AuthError::RefreshTokenMissing)) => {
                debug!(error = %e, "Nothing to refresh");
                false
            }
            Err(e) => {
                warn!(error = %e, "Token refresh failed");
                false
            }
        }
    }

    /// Load and cache the current user's profile.
    ///
    /// Returns `None` without a request if no credential is held. A `401`
    /// triggers at most one refresh and one retry (refresh strategy only);
    /// if the credential still cannot be used the session is cleared. Other
    /// failures are logged and leave the session as it is.
    #[instrument(skip(self))]
    pub async fn fetch_user_profile(&self) -> Option<UserRecord> {
        if !self.is_authenticated() {
            return None;
        }

        let _loading = self.loading();
        match self.load_profile().await {
            Ok(user) => self.store_user(user),
            Err(e @ Error::Auth(AuthError::SessionExpired)) => {
                info!(error = %e, "Credential rejected, session cleared");
                None
            }
            Err(e) => {
                warn!(error = %e, "Error fetching user profile");
                None
            }
        }
    }

    /// Validate the session against the backend.
    ///
    /// True iff a credential is held and the profile could be loaded.
    #[instrument(skip(self))]
    pub async fn check_auth(&self) -> bool {
        if !self.is_authenticated() {
            return false;
        }
        self.fetch_user_profile().await.is_some()
    }

    /// Exchange the held refresh token for a new credential and commit it.
    ///
    /// `Ok(false)` means the session changed while the request was in flight
    /// and the new credential was dropped.
    async fn renew(&self) -> Result<bool> {
        let refresh = self
            .read_state()
            .renewal
            .as_ref()
            .and_then(RenewalCredential::refresh_token)
            .cloned()
            .ok_or(AuthError::RefreshTokenMissing)?;

        let access = self.inner.backend.refresh(&refresh).await?;
        if access.is_empty() {
            return Err(TransportError::Decode {
                message: "refresh response carried an empty token".to_string(),
            }
            .into());
        }

        self.commit(|current| {
            // Drop the result if the session was replaced or cleared meanwhile.
            let still_held = current
                .renewal
                .as_ref()
                .and_then(RenewalCredential::refresh_token)
                == Some(&refresh);
            still_held.then(|| Snapshot {
                token: Some(access),
                ..current.clone()
            })
        })
    }

    /// The bounded fetch loop behind [`fetch_user_profile`](Self::fetch_user_profile).
    ///
    /// Fails with [`AuthError::SessionExpired`] once the credential is
    /// rejected for good, and with [`AuthError::ProfileFetchFailed`] for
    /// anything else.
    async fn load_profile(&self) -> Result<UserRecord> {
        let mut retried = false;

        loop {
            let token = self.access_token().ok_or(AuthError::SessionExpired)?;

            match self.inner.backend.fetch_user(&token).await {
                Ok(user) => return Ok(user),
                Err(e) if e.is_unauthorized() => {
                    let can_refresh = self.config().renewal == RenewalStrategy::RefreshToken;
                    if can_refresh && !retried {
                        retried = true;
                        if self.refresh_access_token().await {
                            debug!("Retrying profile fetch with refreshed token");
                            continue;
                        }
                    }
                    self.invalidate(&token);
                    return Err(AuthError::SessionExpired.into());
                }
                Err(e) => {
                    return Err(AuthError::ProfileFetchFailed {
                        reason: e.to_string(),
                    }
                    .into());
                }
            }
        }
    }

    /// Forget the session in memory and in storage. Idempotent.
    pub fn clear_auth_data(&self) {
        let mut state = self.write_state();
        *state = Snapshot::default();
        self.persist_clear();
    }

    /// Clear the session only if it still holds `token`.
    fn invalidate(&self, token: &AccessToken) {
        let mut state = self.write_state();
        let held = state.token.as_ref();
        if held.is_some() && held != Some(token) {
            debug!("Session changed since the rejected request, keeping it");
            return;
        }
        *state = Snapshot::default();
        self.persist_clear();
    }

    fn persist_clear(&self) {
        let ops = Snapshot::clear_ops(self.config().renewal);
        if let Err(e) = self.inner.storage.apply(&ops) {
            warn!(error = %e, "Could not clear persisted session");
        }
    }

    fn store_user(&self, user: UserRecord) -> Option<UserRecord> {
        let committed = self.commit(|current| {
            current.token.as_ref()?;
            Some(Snapshot {
                user: Some(user.clone()),
                ..current.clone()
            })
        });

        match committed {
            Ok(true) => Some(user),
            Ok(false) => {
                debug!("Session cleared during profile fetch, discarding profile");
                None
            }
            Err(e) => {
                warn!(error = %e, "Could not persist user profile");
                Some(user)
            }
        }
    }

    /// Apply a state change to storage, then to memory.
    ///
    /// `update` sees the current state and returns the next one, or `None`
    /// to leave everything untouched. Returns whether a change was applied.
    fn commit<F>(&self, update: F) -> Result<bool>
    where
        F: FnOnce(&Snapshot) -> Option<Snapshot>,
    {
        let mut state = self.write_state();
        let Some(next) = update(&*state) else {
            return Ok(false);
        };

        let ops = next.write_ops(self.config().renewal)?;
        self.inner.storage.apply(&ops)?;
        *state = next;
        Ok(true)
    }

    fn loading(&self) -> Loading<'_> {
        Loading::enter(&self.inner.loading)
    }

    fn read_state(&self) -> RwLockReadGuard<'_, Snapshot> {
        self.inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, Snapshot> {
        self.inner
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl AuthSession for SessionStore {
    fn is_authenticated(&self) -> bool {
        SessionStore::is_authenticated(self)
    }

    async fn check_auth(&self) -> Result<bool> {
        Ok(SessionStore::check_auth(self).await)
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("base_url", &self.config().base_url)
            .field("renewal", &self.config().renewal)
            .field("authenticated", &self.is_authenticated())
            .field("tokens", &"[REDACTED]")
            .finish()
    }
}
