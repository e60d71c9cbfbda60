//! Typed calls to the auth backend.

use tracing::{debug, instrument};

use authgate_core::error::{AuthError, Error};
use authgate_core::{
    AccessToken, AuthConfig, Credentials, LoginField, RefreshToken, Registration, Result,
    SessionId, UserRecord,
};

use crate::rest::{
    ApiClient, LoginRequest, LoginResponse, LogoutRequest, RefreshRequest, RefreshResponse,
    RegisterRequest,
};

/// Fallback message for a rejected login.
pub const LOGIN_FAILED: &str = "Login failed";

/// Fallback message for a rejected registration.
pub const REGISTRATION_FAILED: &str = "Registration failed";

/// Field errors checked, in order, when registration is rejected.
const REGISTRATION_FIELDS: [&str; 3] = ["username", "email", "password"];

/// The auth endpoints of one backend.
#[derive(Debug, Clone)]
pub struct AuthBackend {
    config: AuthConfig,
    client: ApiClient,
}

impl AuthBackend {
    /// Create a backend for the given configuration.
    pub fn new(config: AuthConfig) -> Result<Self> {
        let client = ApiClient::new(&config)?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Exchange credentials for a session.
    ///
    /// A non-success status becomes [`AuthError::AuthenticationFailed`] with
    /// the backend's `detail` or `message`; transport failures pass through.
    #[instrument(skip(self, credentials))]
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse> {
        let identifier = Some(credentials.identifier());
        let request = match self.config.login_field {
            LoginField::Username => LoginRequest {
                username: identifier,
                email: None,
                password: credentials.password(),
            },
            LoginField::Email => LoginRequest {
                username: None,
                email: identifier,
                password: credentials.password(),
            },
        };

        self.client
            .post(&self.config.endpoints.login, &request, None)
            .await
            .map_err(|e| match e {
                Error::Protocol(err) => AuthError::AuthenticationFailed {
                    message: err.summary().unwrap_or(LOGIN_FAILED).to_string(),
                }
                .into(),
                other => other,
            })
    }

    /// Create an account.
    ///
    /// A non-success status becomes [`AuthError::RegistrationFailed`] with
    /// the first of the `username`, `email`, `password` field errors, else
    /// `detail`, else `message`.
    #[instrument(skip(self, registration), fields(username = %registration.username))]
    pub async fn register(&self, registration: &Registration) -> Result<()> {
        let request = RegisterRequest {
            username: &registration.username,
            email: &registration.email,
            password: registration.password(),
        };

        self.client
            .post_no_response(&self.config.endpoints.register, &request, None)
            .await
            .map_err(|e| match e {
                Error::Protocol(err) => AuthError::RegistrationFailed {
                    message: err
                        .first_field_error(&REGISTRATION_FIELDS)
                        .or_else(|| err.summary())
                        .unwrap_or(REGISTRATION_FAILED)
                        .to_string(),
                }
                .into(),
                other => other,
            })
    }

    /// Tell the backend the session is over.
    #[instrument(skip(self, token, session_id))]
    pub async fn logout(&self, token: &AccessToken, session_id: Option<&SessionId>) -> Result<()> {
        let request = LogoutRequest {
            session_id: session_id.map(SessionId::as_str),
        };
        self.client
            .post_no_response(&self.config.endpoints.logout, &request, Some(token))
            .await
    }

    /// Mint a new access token.
    #[instrument(skip(self, refresh))]
    pub async fn refresh(&self, refresh: &RefreshToken) -> Result<AccessToken> {
        let request = RefreshRequest {
            refresh: refresh.as_str(),
        };
        let response: RefreshResponse = self
            .client
            .post(&self.config.endpoints.refresh, &request, None)
            .await?;

        debug!("Access token refreshed");
        Ok(AccessToken::new(response.access))
    }

    /// Load the profile of the token's owner.
    #[instrument(skip(self, token))]
    pub async fn fetch_user(&self, token: &AccessToken) -> Result<UserRecord> {
        self.client
            .get_authed(&self.config.endpoints.user, token)
            .await
    }
}
