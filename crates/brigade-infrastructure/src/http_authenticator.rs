//! HttpAuthenticator - verifies credentials against the restaurant REST API.
//!
//! Endpoints, relative to the configured base URL:
//! - `POST /auth/login` with `{"username","password"}`, answering
//!   `{"user","business","token"}`
//! - `POST /auth/logout` with `Authorization: Bearer <token>`

use async_trait::async_trait;
use brigade_core::error::{BrigadeError, Result};
use brigade_core::{Authenticator, Credentials, SessionSeed};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const LOGIN_PATH: &str = "auth/login";
const LOGOUT_PATH: &str = "auth/logout";
const DEFAULT_REJECTION: &str = "Invalid username or password";

/// Authenticator backed by the REST endpoint set.
#[derive(Debug, Clone)]
pub struct HttpAuthenticator {
    client: Client,
    base_url: String,
}

impl HttpAuthenticator {
    /// Creates an authenticator whose requests give up after `request_timeout`.
    pub fn new(base_url: impl Into<String>, request_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|err| BrigadeError::config(format!("Failed to build HTTP client: {err}")))?;
        Ok(Self::with_client(base_url, client))
    }

    /// Uses a preconfigured client (proxy settings, TLS roots, ...).
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl Authenticator for HttpAuthenticator {
    async fn verify_credentials(&self, credentials: &Credentials) -> Result<SessionSeed> {
        let url = self.endpoint(LOGIN_PATH);
        tracing::debug!(%url, username = %credentials.username, "verifying credentials");

        let response = self
            .client
            .post(&url)
            .json(&LoginRequest {
                username: credentials.username.trim(),
                password: &credentials.password,
            })
            .send()
            .await
            .map_err(unavailable)?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response.text().await.unwrap_or_default();
            return Err(map_http_error(status, &body_text));
        }

        response.json::<SessionSeed>().await.map_err(|err| {
            BrigadeError::authentication(format!("Unexpected login response: {err}"))
        })
    }

    async fn revoke(&self, token: &str) -> Result<()> {
        let response = self
            .client
            .post(self.endpoint(LOGOUT_PATH))
            .bearer_auth(token)
            .send()
            .await
            .map_err(unavailable)?;

        let status = response.status();
        if status.is_success() || status == StatusCode::UNAUTHORIZED {
            // an already-invalid token is as good as revoked
            return Ok(());
        }
        Err(BrigadeError::authentication(format!(
            "Logout rejected (HTTP {})",
            status.as_u16()
        )))
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct ErrorResponse {
    #[serde(alias = "error")]
    message: String,
}

fn unavailable(err: reqwest::Error) -> BrigadeError {
    BrigadeError::authentication(format!("authentication service unavailable: {err}"))
}

fn map_http_error(status: StatusCode, body: &str) -> BrigadeError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|wrapper| wrapper.message)
        .ok()
        .filter(|message| !message.trim().is_empty());

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => BrigadeError::authentication(
            message.unwrap_or_else(|| DEFAULT_REJECTION.to_string()),
        ),
        _ => BrigadeError::authentication(match message {
            Some(message) => format!("Login failed (HTTP {}): {}", status.as_u16(), message),
            None => format!("Login failed (HTTP {})", status.as_u16()),
        }),
    }
}
