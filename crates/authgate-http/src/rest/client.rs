//! REST HTTP client implementation.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderValue};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument, trace};

use authgate_core::error::{Error, InvalidInputError, ProtocolError, TransportError};
use authgate_core::{AccessToken, ApiUrl, AuthConfig, AuthScheme, Result};

/// HTTP client bound to one backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base: ApiUrl,
    scheme: AuthScheme,
    timeout: Duration,
}

impl ApiClient {
    /// Create a client for the configured backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialised.
    pub fn new(config: &AuthConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("authgate/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout())
            .build()
            .map_err(|e| TransportError::Http {
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base: config.base_url.clone(),
            scheme: config.auth_scheme,
            timeout: config.timeout(),
        })
    }

    /// POST a JSON body and decode a JSON response.
    #[instrument(skip(self, body, token), fields(base = %self.base))]
    pub async fn post<B, R>(&self, path: &str, body: &B, token: Option<&AccessToken>) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.base.endpoint_url(path);
        debug!(%url, authed = token.is_some(), "POST");

        let mut request = self.client.post(&url).json(body);
        if let Some(token) = token {
            request = request.header(AUTHORIZATION, self.auth_header(token)?);
        }

        let response = request.send().await.map_err(|e| self.transport_error(e))?;
        self.handle_response(response).await
    }

    /// POST a JSON body, ignoring any success body.
    #[instrument(skip(self, body, token), fields(base = %self.base))]
    pub async fn post_no_response<B>(
        &self,
        path: &str,
        body: &B,
        token: Option<&AccessToken>,
    ) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let url = self.base.endpoint_url(path);
        debug!(%url, authed = token.is_some(), "POST (no response)");

        let mut request = self.client.post(&url).json(body);
        if let Some(token) = token {
            request = request.header(AUTHORIZATION, self.auth_header(token)?);
        }

        let response = request.send().await.map_err(|e| self.transport_error(e))?;

        let status = response.status();
        trace!(status = %status, "response");
        if status.is_success() {
            Ok(())
        } else {
            Err(Error::Protocol(self.parse_error_response(response).await))
        }
    }

    /// Authorized GET decoding a JSON response.
    #[instrument(skip(self, token), fields(base = %self.base))]
    pub async fn get_authed<R>(&self, path: &str, token: &AccessToken) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let url = self.base.endpoint_url(path);
        debug!(%url, "GET");

        let response = self
            .client
            .get(&url)
            .header(AUTHORIZATION, self.auth_header(token)?)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        self.handle_response(response).await
    }

    /// Build the `Authorization` header for a token.
    fn auth_header(&self, token: &AccessToken) -> Result<HeaderValue> {
        let mut value = HeaderValue::from_str(&self.scheme.header_value(token.as_str()))
            .map_err(|_| InvalidInputError::Other {
                message: "token contains characters not allowed in a header".to_string(),
            })?;
        value.set_sensitive(true);
        Ok(value)
    }

    /// Handle a response, decoding the body or the error.
    async fn handle_response<R: DeserializeOwned>(&self, response: reqwest::Response) -> Result<R> {
        let status = response.status();
        trace!(status = %status, "response");

        if status.is_success() {
            response
                .json::<R>()
                .await
                .map_err(|e| self.transport_error(e))
        } else {
            Err(Error::Protocol(self.parse_error_response(response).await))
        }
    }

    /// Parse an error body. Bodies that are not JSON keep only the status.
    async fn parse_error_response(&self, response: reqwest::Response) -> ProtocolError {
        let status = response.status().as_u16();

        match response.json::<serde_json::Value>().await {
            Ok(body) => ProtocolError::from_body(status, &body),
            Err(_) => ProtocolError::new(status),
        }
    }

    fn transport_error(&self, err: reqwest::Error) -> Error {
        let transport = if err.is_timeout() {
            TransportError::Timeout {
                duration_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            }
        } else if err.is_connect() {
            TransportError::Connection {
                message: err.to_string(),
            }
        } else if err.is_decode() {
            TransportError::Decode {
                message: err.to_string(),
            }
        } else {
            TransportError::Http {
                message: err.to_string(),
            }
        };
        Error::Transport(transport)
    }
}
