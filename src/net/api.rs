//! REST client for the banking dashboard backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every request re-reads the token from the shared [`TokenStore`] and
//! attaches it as a bearer credential when present, so calls issued after a
//! login or logout pick up the change without rebuilding the client.
//!
//! ERROR HANDLING
//! ==============
//! Non-2xx responses become [`ApiError::Status`] carrying the backend's
//! `detail` message when one is given. The client never retries and never
//! interprets a 401; callers decide what an auth failure means.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;

use super::types::{
    ChatMessage, ChatReply, FraudAlert, FraudInsights, Identity, LoginResponse, RegisterRequest,
};
use crate::config::{ClientConfig, HttpTimeouts};
use crate::state::store::TokenStore;

/// Number of sample alerts requested when the caller does not choose.
pub const DEFAULT_ALERT_LIMIT: u32 = 10;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by REST calls.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, connect, timeout, reset).
    #[error("request failed: {0}")]
    Network(String),

    /// The backend answered with a non-success status.
    #[error("{}", status_message(*status, detail.as_deref()))]
    Status { status: u16, detail: Option<String> },

    /// The response body did not match the expected shape.
    #[error("response parse failed: {0}")]
    Decode(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ApiError {
    /// Backend-provided `detail` message, if the backend sent one.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// HTTP status for [`ApiError::Status`].
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn status_message(status: u16, detail: Option<&str>) -> String {
    match detail {
        Some(detail) => format!("server returned {status}: {detail}"),
        None => format!("server returned {status}"),
    }
}

/// Pull a string `detail` field out of an error body.
///
/// Validation errors carry a structured `detail` array; those yield `None`
/// so callers fall back to their own message.
fn error_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let detail = value.get("detail")?.as_str()?.trim();
    (!detail.is_empty()).then(|| detail.to_owned())
}

fn bearer_header_value(token: &str) -> String {
    format!("Bearer {token}")
}

fn sample_alerts_path(limit: u32) -> String {
    format!("/fraud/alerts/sample?limit={limit}")
}

fn user_path(user_id: &str) -> String {
    format!("/users/{user_id}")
}

// =============================================================================
// AUTH API TRAIT
// =============================================================================

/// The three auth endpoints the session manager depends on. Enables mocking
/// in tests.
#[async_trait::async_trait]
pub trait AuthApi: Send + Sync {
    /// `POST /auth/login` with form-encoded credentials.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure or a non-2xx response.
    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError>;

    /// `POST /auth/register` with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure or a non-2xx response.
    async fn register(&self, request: &RegisterRequest) -> Result<Identity, ApiError>;

    /// `GET /auth/me` using the stored bearer token.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure, 401 for an invalid or
    /// expired token, or any other non-2xx response.
    async fn current_user(&self) -> Result<Identity, ApiError>;
}

// =============================================================================
// CLIENT
// =============================================================================

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenStore>,
}

impl ApiClient {
    /// Build a client rooted at `base_url` (e.g. `http://localhost:8000/api/v1`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(base_url: &str, timeouts: HttpTimeouts, tokens: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_owned(), tokens })
    }

    /// Build a client from parsed config.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn from_config(config: &ClientConfig, tokens: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        Self::new(&config.api_url, config.timeouts, tokens)
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{path}", self.base_url);
        tracing::debug!(%method, %path, "api request");
        let builder = self.http.request(method, url);
        match self.tokens.load() {
            Some(token) => builder.header(AUTHORIZATION, bearer_header_value(&token)),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await.map_err(|e| ApiError::Network(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| ApiError::Network(e.to_string()))?;

        if !(200..300).contains(&status) {
            let detail = error_detail(&body);
            tracing::debug!(status, detail = detail.as_deref().unwrap_or(""), "api error response");
            return Err(ApiError::Status { status, detail });
        }

        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Send a message to the banking assistant via `POST /chat/message`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure or a non-2xx response.
    pub async fn send_chat_message(&self, message: &str) -> Result<ChatReply, ApiError> {
        let body = ChatMessage { message: message.to_owned() };
        self.send(self.request(Method::POST, "/chat/message").json(&body)).await
    }

    /// Fetch the personalized assistant greeting from `GET /chat/greeting`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure or a non-2xx response.
    pub async fn chat_greeting(&self) -> Result<ChatReply, ApiError> {
        self.send(self.request(Method::GET, "/chat/greeting")).await
    }

    /// Fetch up to `limit` sample alerts from `GET /fraud/alerts/sample`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure or a non-2xx response
    /// (403 for non-admin accounts).
    pub async fn sample_fraud_alerts(&self, limit: u32) -> Result<Vec<FraudAlert>, ApiError> {
        self.send(self.request(Method::GET, &sample_alerts_path(limit))).await
    }

    /// Fetch aggregate fraud statistics from `GET /fraud/insights`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure or a non-2xx response.
    pub async fn fraud_insights(&self) -> Result<FraudInsights, ApiError> {
        self.send(self.request(Method::GET, "/fraud/insights")).await
    }

    /// List accounts via `GET /users/`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure or a non-2xx response.
    pub async fn list_users(&self) -> Result<Vec<Identity>, ApiError> {
        self.send(self.request(Method::GET, "/users/")).await
    }

    /// Fetch one account via `GET /users/{id}`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure or a non-2xx response.
    pub async fn get_user(&self, user_id: &str) -> Result<Identity, ApiError> {
        self.send(self.request(Method::GET, &user_path(user_id))).await
    }
}

#[async_trait::async_trait]
impl AuthApi for ApiClient {
    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let form = [("username", username), ("password", password)];
        self.send(self.request(Method::POST, "/auth/login").form(&form)).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<Identity, ApiError> {
        self.send(self.request(Method::POST, "/auth/register").json(request)).await
    }

    async fn current_user(&self) -> Result<Identity, ApiError> {
        self.send(self.request(Method::GET, "/auth/me")).await
    }
}
