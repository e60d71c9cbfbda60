//! Mock backend tests for the session store.
//!
//! These tests use wiremock to simulate the auth backend and check the
//! session lifecycle without network access.

use std::sync::Arc;
use std::time::Duration;

use authgate_core::error::{AuthError, Error, StorageError};
use authgate_core::snapshot::{
    AUTH_REFRESH_TOKEN_KEY, AUTH_SESSION_ID_KEY, AUTH_TOKEN_KEY, AUTH_USER_KEY,
};
use authgate_core::{
    AccessToken, ApiUrl, AuthConfig, AuthScheme, Credentials, LoginField, MemoryStorage,
    Navigation, NavigationGuard, Registration, RenewalStrategy, RouteDescriptor, RouteTarget,
    SessionStorage, StorageOp,
};
use authgate_http::SessionStore;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper to build a config pointing at a mock server.
fn mock_config(server: &MockServer) -> AuthConfig {
    let url = format!("http://127.0.0.1:{}/api", server.address().port());
    AuthConfig::new(ApiUrl::new(&url).unwrap())
}

fn new_store(config: AuthConfig, storage: &Arc<MemoryStorage>) -> SessionStore {
    SessionStore::new(config, storage.clone()).unwrap()
}

fn alice() -> serde_json::Value {
    json!({ "id": 1, "username": "alice", "email": "alice@example.com" })
}

/// Storage seeded with a signed-in refresh-flow session.
fn signed_in_storage(token: &str, refresh: &str) -> Arc<MemoryStorage> {
    Arc::new(MemoryStorage::with_entries([
        (AUTH_TOKEN_KEY, token),
        (AUTH_REFRESH_TOKEN_KEY, refresh),
    ]))
}

async fn mount_login(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/api/auth/login/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Storage that can be read but never written.
struct ReadOnlyStorage;

impl SessionStorage for ReadOnlyStorage {
    fn get(&self, _key: &str) -> authgate_core::Result<Option<String>> {
        Ok(None)
    }

    fn apply(&self, _ops: &[StorageOp]) -> authgate_core::Result<()> {
        Err(StorageError::Io {
            message: "read-only".to_string(),
        }
        .into())
    }
}

// ============================================================================
// Login Tests
// ============================================================================

#[tokio::test]
async fn test_login_persists_session() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login/"))
        .and(body_json(json!({
            "email": "alice@example.com",
            "password": "secret123"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "access-1",
            "refresh": "refresh-1",
            "user": alice()
        })))
        .expect(1)
        .mount(&server)
        .await;

    let storage = Arc::new(MemoryStorage::new());
    let store = new_store(mock_config(&server), &storage);

    store
        .login(&Credentials::new("alice@example.com", "secret123"))
        .await
        .unwrap();

    assert!(store.is_authenticated());
    assert!(!store.is_loading());
    assert_eq!(store.access_token(), Some(AccessToken::new("access-1")));
    assert_eq!(store.user().unwrap().username, "alice");

    assert_eq!(storage.get(AUTH_TOKEN_KEY).unwrap().as_deref(), Some("access-1"));
    assert_eq!(
        storage.get(AUTH_REFRESH_TOKEN_KEY).unwrap().as_deref(),
        Some("refresh-1")
    );
    let stored_user: serde_json::Value =
        serde_json::from_str(&storage.get(AUTH_USER_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(stored_user, alice());
}

#[tokio::test]
async fn test_login_with_username_field() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login/"))
        .and(body_json(json!({ "username": "alice", "password": "pw" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "access-1",
            "user": alice()
        })))
        .expect(1)
        .mount(&server)
        .await;

    let storage = Arc::new(MemoryStorage::new());
    let config = mock_config(&server).with_login_field(LoginField::Username);
    let store = new_store(config, &storage);

    store.login(&Credentials::new("alice", "pw")).await.unwrap();

    assert!(store.is_authenticated());
    assert!(store.renewal_credential().is_none());
    assert_eq!(storage.get(AUTH_REFRESH_TOKEN_KEY).unwrap(), None);
}

#[tokio::test]
async fn test_login_failure_uses_detail() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "detail": "No active account found with the given credentials"
        })))
        .mount(&server)
        .await;

    let storage = Arc::new(MemoryStorage::new());
    let store = new_store(mock_config(&server), &storage);

    let err = store
        .login(&Credentials::new("alice@example.com", "wrong"))
        .await
        .unwrap_err();

    match err {
        Error::Auth(AuthError::AuthenticationFailed { message }) => {
            assert_eq!(message, "No active account found with the given credentials");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!store.is_authenticated());
    assert!(!store.is_loading());
    assert!(storage.is_empty());
}

#[tokio::test]
async fn test_login_failure_falls_back_to_message_then_default() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login/"))
        .and(body_json(json!({ "email": "a@example.com", "password": "x" })))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Account locked"
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login/"))
        .and(body_json(json!({ "email": "b@example.com", "password": "x" })))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let store = new_store(mock_config(&server), &Arc::new(MemoryStorage::new()));

    let err = store
        .login(&Credentials::new("a@example.com", "x"))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "authentication error: Account locked");

    let err = store
        .login(&Credentials::new("b@example.com", "x"))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "authentication error: Login failed");
}

#[tokio::test]
async fn test_login_unreachable_backend_is_transport_error() {
    let config = AuthConfig::new(ApiUrl::new("http://127.0.0.1:1").unwrap());
    let store = SessionStore::new(config, Arc::new(MemoryStorage::new())).unwrap();

    let err = store
        .login(&Credentials::new("alice@example.com", "pw"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Transport(_)));
    assert!(!store.is_loading());
}

#[tokio::test]
async fn test_login_storage_failure_leaves_memory_untouched() {
    let server = MockServer::start().await;
    mount_login(
        &server,
        json!({ "token": "access-1", "refresh": "refresh-1", "user": alice() }),
    )
    .await;

    let store = SessionStore::new(mock_config(&server), Arc::new(ReadOnlyStorage)).unwrap();
    let err = store
        .login(&Credentials::new("alice@example.com", "pw"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Storage(_)));
    assert!(!store.is_authenticated());
    assert!(store.user().is_none());
}

#[tokio::test]
async fn test_login_session_id_variant() {
    let server = MockServer::start().await;
    mount_login(
        &server,
        json!({ "session_id": "sid-9", "token": "access-1", "user": alice() }),
    )
    .await;

    let storage = Arc::new(MemoryStorage::new());
    let config = mock_config(&server).with_renewal(RenewalStrategy::SessionId);
    let store = new_store(config, &storage);

    store
        .login(&Credentials::new("alice@example.com", "pw"))
        .await
        .unwrap();

    assert_eq!(
        storage.get(AUTH_SESSION_ID_KEY).unwrap().as_deref(),
        Some("sid-9")
    );
    assert_eq!(storage.get(AUTH_REFRESH_TOKEN_KEY).unwrap(), None);
    assert_eq!(
        store
            .renewal_credential()
            .and_then(|r| r.session_id().map(|s| s.as_str().to_string())),
        Some("sid-9".to_string())
    );
}

// ============================================================================
// Registration Tests
// ============================================================================

async fn register_error(body: serde_json::Value) -> String {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/register/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(body))
        .mount(&server)
        .await;

    let store = new_store(mock_config(&server), &Arc::new(MemoryStorage::new()));
    let err = store
        .register(&Registration::new("alice", "alice@example.com", "pw"))
        .await
        .unwrap_err();

    match err {
        Error::Auth(AuthError::RegistrationFailed { message }) => message,
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_register_reports_username_first() {
    let message = register_error(json!({
        "password": ["This password is too common."],
        "email": ["Enter a valid email address."],
        "username": ["This field is required."]
    }))
    .await;
    assert_eq!(message, "This field is required.");
}

#[tokio::test]
async fn test_register_reports_email_before_password() {
    let message = register_error(json!({
        "password": ["This password is too common."],
        "email": ["user with this email already exists."]
    }))
    .await;
    assert_eq!(message, "user with this email already exists.");
}

#[tokio::test]
async fn test_register_falls_back_to_detail_then_default() {
    let message = register_error(json!({ "detail": "Registration closed" })).await;
    assert_eq!(message, "Registration closed");

    let message = register_error(json!({ "non_field_errors": [] })).await;
    assert_eq!(message, "Registration failed");
}

#[tokio::test]
async fn test_register_does_not_sign_in() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/register/"))
        .and(body_json(json!({
            "username": "alice",
            "email": "alice@example.com",
            "password": "pw"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "token": "should-be-ignored",
            "user": alice()
        })))
        .expect(1)
        .mount(&server)
        .await;

    let storage = Arc::new(MemoryStorage::new());
    let store = new_store(mock_config(&server), &storage);

    store
        .register(&Registration::new("alice", "alice@example.com", "pw"))
        .await
        .unwrap();

    assert!(!store.is_authenticated());
    assert!(!store.is_loading());
    assert!(storage.is_empty());
}

// ============================================================================
// Logout Tests
// ============================================================================

#[tokio::test]
async fn test_logout_clears_after_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/logout/"))
        .and(header("authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let storage = signed_in_storage("access-1", "refresh-1");
    let store = new_store(mock_config(&server), &storage);

    store.logout().await;

    assert!(!store.is_authenticated());
    assert!(store.renewal_credential().is_none());
    assert!(storage.is_empty());
}

#[tokio::test]
async fn test_logout_clears_after_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/logout/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let storage = signed_in_storage("access-1", "refresh-1");
    storage
        .apply(&[StorageOp::set(AUTH_USER_KEY, alice().to_string())])
        .unwrap();
    let store = new_store(mock_config(&server), &storage);
    assert!(store.user().is_some());

    store.logout().await;

    assert!(!store.is_authenticated());
    assert!(store.user().is_none());
    assert!(storage.is_empty());
}

#[tokio::test]
async fn test_logout_clears_after_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/logout/"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let storage = signed_in_storage("access-1", "refresh-1");
    let config = mock_config(&server).with_timeout(Duration::from_secs(1));
    let store = new_store(config, &storage);

    store.logout().await;

    assert!(!store.is_authenticated());
    assert!(storage.is_empty());
}

#[tokio::test]
async fn test_logout_session_variant_sends_session_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/logout/"))
        .and(header("authorization", "Token access-1"))
        .and(body_json(json!({ "session_id": "sid-9" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let storage = Arc::new(MemoryStorage::with_entries([
        (AUTH_TOKEN_KEY, "access-1"),
        (AUTH_SESSION_ID_KEY, "sid-9"),
    ]));
    let config = mock_config(&server)
        .with_renewal(RenewalStrategy::SessionId)
        .with_auth_scheme(AuthScheme::Token);
    let store = new_store(config, &storage);

    store.logout().await;

    assert!(storage.is_empty());
}

#[tokio::test]
async fn test_logout_without_session_skips_backend() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/logout/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let store = new_store(mock_config(&server), &Arc::new(MemoryStorage::new()));
    store.logout().await;
    assert!(!store.is_authenticated());
}

// ============================================================================
// Profile & Refresh Tests
// ============================================================================

#[tokio::test]
async fn test_fetch_profile_without_token_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/user/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(alice()))
        .expect(0)
        .mount(&server)
        .await;

    let store = new_store(mock_config(&server), &Arc::new(MemoryStorage::new()));

    assert!(store.fetch_user_profile().await.is_none());
    assert!(!store.check_auth().await);
}

#[tokio::test]
async fn test_fetch_profile_persists_user() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/user/"))
        .and(header("authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(alice()))
        .expect(1)
        .mount(&server)
        .await;

    let storage = signed_in_storage("access-1", "refresh-1");
    let store = new_store(mock_config(&server), &storage);

    let user = store.fetch_user_profile().await.unwrap();

    assert_eq!(user.email, "alice@example.com");
    assert_eq!(store.user(), Some(user));
    assert!(storage.get(AUTH_USER_KEY).unwrap().is_some());
    assert!(!store.is_loading());
}

#[tokio::test]
async fn test_fetch_profile_refreshes_once_and_retries() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/user/"))
        .and(header("authorization", "Bearer expired"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Given token not valid for any token type"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/token/refresh/"))
        .and(body_json(json!({ "refresh": "refresh-1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access": "fresh" })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/auth/user/"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(alice()))
        .expect(1)
        .mount(&server)
        .await;

    let storage = signed_in_storage("expired", "refresh-1");
    let store = new_store(mock_config(&server), &storage);

    let user = store.fetch_user_profile().await.unwrap();

    assert_eq!(user.username, "alice");
    assert_eq!(store.access_token(), Some(AccessToken::new("fresh")));
    assert_eq!(storage.get(AUTH_TOKEN_KEY).unwrap().as_deref(), Some("fresh"));
    // The refresh token is not rotated.
    assert_eq!(
        storage.get(AUTH_REFRESH_TOKEN_KEY).unwrap().as_deref(),
        Some("refresh-1")
    );
}

#[tokio::test]
async fn test_fetch_profile_failed_refresh_clears_session() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/user/"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/token/refresh/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Token is blacklisted"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let storage = signed_in_storage("expired", "refresh-1");
    let store = new_store(mock_config(&server), &storage);

    assert!(store.fetch_user_profile().await.is_none());
    assert!(!store.is_authenticated());
    assert!(storage.is_empty());
}

#[tokio::test]
async fn test_fetch_profile_retries_at_most_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/user/"))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/token/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access": "also-bad" })))
        .expect(1)
        .mount(&server)
        .await;

    let storage = signed_in_storage("expired", "refresh-1");
    let store = new_store(mock_config(&server), &storage);

    assert!(store.fetch_user_profile().await.is_none());
    assert!(!store.is_authenticated());
    assert!(storage.is_empty());
}

#[tokio::test]
async fn test_fetch_profile_session_variant_clears_on_401() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/user/"))
        .and(header("authorization", "Token access-1"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/token/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access": "x" })))
        .expect(0)
        .mount(&server)
        .await;

    let storage = Arc::new(MemoryStorage::with_entries([
        (AUTH_TOKEN_KEY, "access-1"),
        (AUTH_SESSION_ID_KEY, "sid-9"),
    ]));
    let config = mock_config(&server)
        .with_renewal(RenewalStrategy::SessionId)
        .with_auth_scheme(AuthScheme::Token);
    let store = new_store(config, &storage);

    assert!(!store.refresh_access_token().await);
    assert!(store.fetch_user_profile().await.is_none());
    assert!(storage.is_empty());
}

#[tokio::test]
async fn test_fetch_profile_server_error_keeps_session() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/user/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let storage = signed_in_storage("access-1", "refresh-1");
    let store = new_store(mock_config(&server), &storage);

    assert!(store.fetch_user_profile().await.is_none());
    assert!(store.is_authenticated());
    assert_eq!(storage.get(AUTH_TOKEN_KEY).unwrap().as_deref(), Some("access-1"));
}

#[tokio::test]
async fn test_fetch_profile_malformed_body_keeps_session() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/user/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let storage = signed_in_storage("access-1", "refresh-1");
    let store = new_store(mock_config(&server), &storage);

    assert!(store.fetch_user_profile().await.is_none());
    assert!(!store.check_auth().await);
    assert!(store.is_authenticated());
}

#[tokio::test]
async fn test_refresh_failure_leaves_state() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/token/refresh/"))
        .respond_with(ResponseTemplate::new(400))
        .expect(1)
        .mount(&server)
        .await;

    let storage = signed_in_storage("access-1", "refresh-1");
    let store = new_store(mock_config(&server), &storage);

    assert!(!store.refresh_access_token().await);
    assert_eq!(store.access_token(), Some(AccessToken::new("access-1")));
    assert_eq!(storage.get(AUTH_TOKEN_KEY).unwrap().as_deref(), Some("access-1"));
}

#[tokio::test]
async fn test_refresh_with_empty_token_is_a_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/token/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access": "" })))
        .expect(1)
        .mount(&server)
        .await;

    let storage = signed_in_storage("access-1", "refresh-1");
    let store = new_store(mock_config(&server), &storage);

    assert!(!store.refresh_access_token().await);
    assert!(store.is_authenticated());
    assert_eq!(store.access_token(), Some(AccessToken::new("access-1")));
    assert_eq!(storage.get(AUTH_TOKEN_KEY).unwrap().as_deref(), Some("access-1"));
}

#[tokio::test]
async fn test_fetch_profile_empty_refreshed_token_clears_session() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/user/"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/token/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access": "" })))
        .expect(1)
        .mount(&server)
        .await;

    let storage = signed_in_storage("expired", "refresh-1");
    storage
        .apply(&[StorageOp::set(AUTH_USER_KEY, alice().to_string())])
        .unwrap();
    let store = new_store(mock_config(&server), &storage);

    assert!(store.fetch_user_profile().await.is_none());
    assert!(!store.is_authenticated());
    assert!(store.renewal_credential().is_none());
    assert!(store.user().is_none());
    assert!(storage.is_empty());
}

#[tokio::test]
async fn test_profile_without_id_is_accepted() {
    let server = MockServer::start().await;
    let profile = json!({ "pk": 1, "username": "alice", "email": "alice@example.com" });

    Mock::given(method("GET"))
        .and(path("/api/auth/user/"))
        .and(header("authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let storage = signed_in_storage("access-1", "refresh-1");
    let store = new_store(mock_config(&server), &storage);

    assert!(store.check_auth().await);

    let user = store.user().unwrap();
    assert_eq!(user.id, None);
    assert_eq!(user.username, "alice");
    let stored: serde_json::Value =
        serde_json::from_str(&storage.get(AUTH_USER_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(stored, profile);
}

#[tokio::test]
async fn test_login_user_without_id_is_accepted() {
    let server = MockServer::start().await;
    mount_login(
        &server,
        json!({ "token": "access-1", "refresh": "refresh-1", "user": { "pk": 1, "username": "alice" } }),
    )
    .await;

    let storage = Arc::new(MemoryStorage::new());
    let store = new_store(mock_config(&server), &storage);

    store
        .login(&Credentials::new("alice@example.com", "pw"))
        .await
        .unwrap();

    assert!(store.is_authenticated());
    let user = store.user().unwrap();
    assert_eq!(user.id, None);
    assert_eq!(user.extra.get("pk"), Some(&json!(1)));
}

// ============================================================================
// check_auth Tests
// ============================================================================

#[tokio::test]
async fn test_check_auth_unreachable_backend_is_false() {
    let storage = signed_in_storage("access-1", "refresh-1");
    let config = AuthConfig::new(ApiUrl::new("http://127.0.0.1:1").unwrap());
    let store = new_store(config, &storage);

    assert!(!store.check_auth().await);
    assert!(!store.is_loading());
}

#[tokio::test]
async fn test_corrupt_user_hydration_then_check_auth() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/user/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(alice()))
        .expect(1)
        .mount(&server)
        .await;

    let storage = Arc::new(MemoryStorage::with_entries([
        (AUTH_TOKEN_KEY, "access-1"),
        (AUTH_REFRESH_TOKEN_KEY, "refresh-1"),
        (AUTH_USER_KEY, "{\"id\": 1,"),
    ]));
    let store = new_store(mock_config(&server), &storage);

    assert!(store.is_authenticated());
    assert!(store.user().is_none());
    assert!(store.renewal_credential().is_some());

    assert!(store.check_auth().await);
    assert_eq!(store.user().unwrap().username, "alice");
}

#[tokio::test]
async fn test_concurrent_check_auth() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/user/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(alice())
                .set_delay(Duration::from_millis(50)),
        )
        .expect(2)
        .mount(&server)
        .await;

    let storage = signed_in_storage("access-1", "refresh-1");
    let store = new_store(mock_config(&server), &storage);

    let (a, b) = tokio::join!(store.check_auth(), store.check_auth());

    assert!(a && b);
    assert!(!store.is_loading());
    assert_eq!(store.user().unwrap().username, "alice");
    assert!(storage.get(AUTH_USER_KEY).unwrap().is_some());
}

// ============================================================================
// Navigation Guard Tests
// ============================================================================

fn protected() -> RouteDescriptor {
    RouteDescriptor::new("dashboard", "/dashboard")
}

fn to_login() -> Navigation {
    Navigation::Redirect(RouteTarget::Named("login".to_string()))
}

#[tokio::test]
async fn test_guard_redirects_unauthenticated_without_requests() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/user/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(alice()))
        .expect(0)
        .mount(&server)
        .await;

    let store = new_store(mock_config(&server), &Arc::new(MemoryStorage::new()));
    let guard = NavigationGuard::new(store);

    assert_eq!(guard.before_enter(&protected(), None).await, to_login());
}

#[tokio::test]
async fn test_guard_allows_valid_session() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/user/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(alice()))
        .expect(1)
        .mount(&server)
        .await;

    let storage = signed_in_storage("access-1", "refresh-1");
    let guard = NavigationGuard::new(new_store(mock_config(&server), &storage));

    assert_eq!(
        guard.before_enter(&protected(), None).await,
        Navigation::Allow
    );
}

#[tokio::test]
async fn test_guard_redirects_expired_session() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/user/"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/token/refresh/"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let storage = signed_in_storage("expired", "refresh-1");
    let store = new_store(mock_config(&server), &storage);
    let guard = NavigationGuard::new(store.clone());

    assert_eq!(guard.before_enter(&protected(), None).await, to_login());
    assert!(!store.is_authenticated());
    assert!(storage.is_empty());
}
