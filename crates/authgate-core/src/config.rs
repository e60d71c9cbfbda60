//! Deployment configuration.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, InvalidInputError};
use crate::types::ApiUrl;

/// Default network timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Scheme prefix of the `Authorization` header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthScheme {
    /// `Authorization: Bearer <token>`
    #[default]
    Bearer,
    /// `Authorization: Token <token>`
    Token,
}

impl AuthScheme {
    /// Format an authorization header value for `token`.
    pub fn header_value(&self, token: &str) -> String {
        format!("{} {}", self, token)
    }
}

impl fmt::Display for AuthScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthScheme::Bearer => f.write_str("Bearer"),
            AuthScheme::Token => f.write_str("Token"),
        }
    }
}

impl FromStr for AuthScheme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bearer" => Ok(AuthScheme::Bearer),
            "token" => Ok(AuthScheme::Token),
            _ => Err(InvalidInputError::Config {
                reason: format!("unknown auth scheme '{}'", s),
            }
            .into()),
        }
    }
}

/// How an expired credential is renewed.
///
/// A deployment uses exactly one of these.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenewalStrategy {
    /// Login returns a refresh token which mints new access tokens.
    #[default]
    RefreshToken,
    /// Login returns a server-side session identifier; there is no refresh.
    SessionId,
}

impl FromStr for RenewalStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.replace('-', "_").to_ascii_lowercase().as_str() {
            "refresh_token" | "refresh" => Ok(RenewalStrategy::RefreshToken),
            "session_id" | "session" => Ok(RenewalStrategy::SessionId),
            _ => Err(InvalidInputError::Config {
                reason: format!("unknown renewal strategy '{}'", s),
            }
            .into()),
        }
    }
}

/// JSON key carrying the login identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginField {
    Username,
    #[default]
    Email,
}

impl LoginField {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoginField::Username => "username",
            LoginField::Email => "email",
        }
    }
}

impl FromStr for LoginField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "username" => Ok(LoginField::Username),
            "email" => Ok(LoginField::Email),
            _ => Err(InvalidInputError::Config {
                reason: format!("unknown login field '{}'", s),
            }
            .into()),
        }
    }
}

/// Endpoint paths, relative to the base URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub login: String,
    pub logout: String,
    pub register: String,
    pub refresh: String,
    pub user: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            login: "/auth/login/".to_string(),
            logout: "/auth/logout/".to_string(),
            register: "/auth/register/".to_string(),
            refresh: "/auth/token/refresh/".to_string(),
            user: "/auth/user/".to_string(),
        }
    }
}

/// Configuration for a session store.
///
/// # Example
///
/// ```
/// use authgate_core::{ApiUrl, AuthConfig, AuthScheme, RenewalStrategy};
///
/// let config = AuthConfig::new(ApiUrl::new("https://example.com/api").unwrap())
///     .with_auth_scheme(AuthScheme::Token)
///     .with_renewal(RenewalStrategy::SessionId);
/// assert_eq!(config.endpoint_url(&config.endpoints.user), "https://example.com/api/auth/user/");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    pub base_url: ApiUrl,
    #[serde(default)]
    pub auth_scheme: AuthScheme,
    #[serde(default)]
    pub renewal: RenewalStrategy,
    #[serde(default)]
    pub login_field: LoginField,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub endpoints: Endpoints,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl AuthConfig {
    /// Create a configuration with defaults for everything but the base URL.
    pub fn new(base_url: ApiUrl) -> Self {
        Self {
            base_url,
            auth_scheme: AuthScheme::default(),
            renewal: RenewalStrategy::default(),
            login_field: LoginField::default(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            endpoints: Endpoints::default(),
        }
    }

    /// Parse a configuration from TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed or the timeout is zero.
    pub fn from_toml_str(s: &str) -> Result<Self, Error> {
        let config: Self = toml::from_str(s).map_err(|e| InvalidInputError::Config {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_auth_scheme(mut self, scheme: AuthScheme) -> Self {
        self.auth_scheme = scheme;
        self
    }

    pub fn with_renewal(mut self, renewal: RenewalStrategy) -> Self {
        self.renewal = renewal;
        self
    }

    pub fn with_login_field(mut self, field: LoginField) -> Self {
        self.login_field = field;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = timeout.as_secs().max(1);
        self
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Network timeout applied to every request.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Absolute URL for an endpoint path.
    pub fn endpoint_url(&self, path: &str) -> String {
        self.base_url.endpoint_url(path)
    }

    /// Check values serde cannot.
    pub fn validate(&self) -> Result<(), Error> {
        if self.timeout_secs == 0 {
            return Err(InvalidInputError::Config {
                reason: "timeout_secs must be greater than zero".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_toml_with_defaults() {
        let config = AuthConfig::from_toml_str(r#"base_url = "https://example.com/api""#).unwrap();
        assert_eq!(config.auth_scheme, AuthScheme::Bearer);
        assert_eq!(config.renewal, RenewalStrategy::RefreshToken);
        assert_eq!(config.login_field, LoginField::Email);
        assert_eq!(config.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(config.endpoints, Endpoints::default());
    }

    #[test]
    fn parses_full_toml() {
        let config = AuthConfig::from_toml_str(
            r#"
            base_url = "http://localhost:8000"
            auth_scheme = "token"
            renewal = "session_id"
            login_field = "username"
            timeout_secs = 5

            [endpoints]
            user = "/api/me/"
            "#,
        )
        .unwrap();

        assert_eq!(config.auth_scheme, AuthScheme::Token);
        assert_eq!(config.renewal, RenewalStrategy::SessionId);
        assert_eq!(config.login_field, LoginField::Username);
        assert_eq!(config.endpoints.user, "/api/me/");
        assert_eq!(config.endpoints.login, "/auth/login/");
    }

    #[test]
    fn rejects_zero_timeout() {
        let result = AuthConfig::from_toml_str(
            r#"
            base_url = "https://example.com"
            timeout_secs = 0
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn header_value_uses_scheme() {
        assert_eq!(AuthScheme::Bearer.header_value("abc"), "Bearer abc");
        assert_eq!(AuthScheme::Token.header_value("abc"), "Token abc");
    }

    #[test]
    fn parses_cli_spellings() {
        assert_eq!("Token".parse::<AuthScheme>().unwrap(), AuthScheme::Token);
        assert_eq!(
            "session-id".parse::<RenewalStrategy>().unwrap(),
            RenewalStrategy::SessionId
        );
        assert!("cookie".parse::<RenewalStrategy>().is_err());
    }
}
