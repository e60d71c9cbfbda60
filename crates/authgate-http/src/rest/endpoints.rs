//! Request/response bodies of the auth endpoints.

use serde::{Deserialize, Serialize};

use authgate_core::UserRecord;

/// Request body for login. Exactly one of `username`/`email` is set.
#[derive(Serialize)]
pub struct LoginRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<&'a str>,
    pub password: &'a str,
}

/// Response from login.
///
/// Refresh-token deployments send `refresh`; session deployments send
/// `session_id`.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    #[serde(alias = "access")]
    pub token: String,
    pub user: UserRecord,
    #[serde(default)]
    pub refresh: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Request body for register.
#[derive(Serialize)]
pub struct RegisterRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Request body for logout.
#[derive(Debug, Serialize)]
pub struct LogoutRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<&'a str>,
}

/// Request body for token refresh.
#[derive(Serialize)]
pub struct RefreshRequest<'a> {
    pub refresh: &'a str,
}

/// Response from token refresh.
#[derive(Debug, Deserialize)]
pub struct RefreshResponse {
    pub access: String,
}
