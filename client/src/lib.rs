//! HTTP access to the task API and the auth API.
//!
//! # Architecture
//!
//! - [`ApiClient`] - preconfigured request sender holding both base URLs
//! - [`tasks`] - list/create/update/delete accessors for `/tasks`
//! - [`auth`] - `POST /auth/login`
//! - [`session`] - [`SessionContext`], the token holder, and the
//!   [`RequestDecorator`] hook through which it reaches every request
//! - [`storage`] - client-local key/value persistence for the session token
//!
//! Accessors contain no business logic. Non-2xx responses and transport
//! failures are returned unmodified as [`ApiError`].

pub mod auth;
pub mod session;
pub mod storage;
pub mod tasks;

pub use auth::{Credentials, LoginResponse};
pub use session::{RequestDecorator, SessionContext, TOKEN_KEY};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use thiserror::Error;
use url::Url;

use taskdesk_config::Settings;

const CONNECT_TIMEOUT_SECS: u64 = 10;
const MAX_ERROR_BODY_BYTES: usize = 4 * 1024;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("API error {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("invalid request URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(err) => err.status(),
            Self::Url(_) => None,
        }
    }
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    auth_url: Url,
    decorator: Option<Arc<dyn RequestDecorator>>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("auth_url", &self.auth_url.as_str())
            .field("decorated", &self.decorator.is_some())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// `base_url` and `auth_url` must end with `/` so relative joins append.
    pub fn new(base_url: Url, auth_url: Url, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            base_url,
            auth_url,
            decorator: None,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, ApiError> {
        Self::new(
            settings.api_url.clone(),
            settings.auth_url.clone(),
            settings.timeout,
        )
    }

    /// Install the hook applied to every outgoing request.
    #[must_use]
    pub fn with_decorator(mut self, decorator: Arc<dyn RequestDecorator>) -> Self {
        self.decorator = Some(decorator);
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn task_url(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path)?)
    }

    pub(crate) fn auth_endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.auth_url.join(path)?)
    }

    pub(crate) fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match &self.decorator {
            Some(decorator) => decorator.decorate(builder),
            None => builder,
        }
    }
}

/// Pass 2xx responses through; turn anything else into [`ApiError::Status`].
pub(crate) async fn ensure_success(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = read_capped_error_body(response).await;
    tracing::warn!(%status, "API request rejected");
    Err(ApiError::Status { status, body })
}

async fn read_capped_error_body(response: Response) -> String {
    use futures_util::StreamExt;

    let mut body = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let Ok(chunk) = chunk else { break };
        body.extend_from_slice(&chunk);
        if body.len() > MAX_ERROR_BODY_BYTES {
            body.truncate(MAX_ERROR_BODY_BYTES);
            let text = String::from_utf8_lossy(&body);
            return format!("{}...(truncated)", text.trim());
        }
    }
    String::from_utf8_lossy(&body).trim().to_string()
}
