//! Login against the auth API.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{ApiClient, ApiError, ensure_success};

#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Both fields are present (whitespace-only counts as missing).
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.email.trim().is_empty() && !self.password.is_empty()
    }
}

// Manual Debug impl to keep passwords out of logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[derive(Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
}

impl std::fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginResponse")
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

impl ApiClient {
    /// `POST /auth/login` with `{email, password}`.
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        let url = self.auth_endpoint("auth/login")?;
        debug!(email = %credentials.email, "Logging in");
        let response = ensure_success(
            self.request(Method::POST, url)
                .json(credentials)
                .send()
                .await?,
        )
        .await?;
        Ok(response.json().await?)
    }
}
