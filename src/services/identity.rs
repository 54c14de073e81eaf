// src/services/identity.rs

//! Identity provider client.
//!
//! Talks to the Firebase Identity Toolkit REST API: account creation,
//! display-name update and (local) sign-out.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::IdentityConfig;
use crate::utils::http::excerpt;
use crate::utils::url::{join_endpoint, parse_base};

/// Error code the provider uses for a duplicate email.
const EMAIL_EXISTS: &str = "EMAIL_EXISTS";

/// Signed-in session returned by account creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    /// Provider-issued user identifier
    pub uid: String,
    pub email: String,
    pub id_token: String,
    pub refresh_token: String,
    pub display_name: Option<String>,
}

/// Account operations needed by registration.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create an email/password account and sign it in.
    async fn create_account(&self, email: &str, password: &str) -> Result<AuthSession>;

    /// Set the account's display name.
    async fn update_profile(&self, session: &mut AuthSession, display_name: &str) -> Result<()>;

    /// End the session.
    async fn sign_out(&self, session: AuthSession) -> Result<()>;
}

/// Firebase Identity Toolkit client.
#[derive(Debug, Clone)]
pub struct FirebaseIdentity {
    base: Url,
    api_key: String,
    client: Client,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignUpRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignUpResponse {
    local_id: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    id_token: String,
    #[serde(default)]
    refresh_token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateRequest<'a> {
    id_token: &'a str,
    display_name: &'a str,
    return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateResponse {
    #[serde(default)]
    display_name: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl FirebaseIdentity {
    /// Create a client from the identity section of the configuration.
    pub fn new(config: &IdentityConfig, client: Client) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(AppError::config(
                "identity.api_key is required for account operations",
            ));
        }
        Ok(Self {
            base: parse_base(&config.base_url)?,
            api_key: config.api_key.trim().to_string(),
            client,
        })
    }

    async fn call<B, R>(&self, method: &str, body: &B) -> Result<R>
    where
        B: Serialize + Sync,
        R: for<'de> Deserialize<'de>,
    {
        let url = join_endpoint(&self.base, &format!("accounts:{method}"))?;
        log::debug!("POST {url}");

        let response = self
            .client
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            return Ok(serde_json::from_str(&text)?);
        }
        Err(provider_error(status.as_u16(), &text))
    }
}

/// Map a provider error body to an [`AppError`].
///
/// Messages look like `EMAIL_EXISTS` or `WEAK_PASSWORD : Password should be ...`.
fn provider_error(status: u16, body: &str) -> AppError {
    let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) else {
        return AppError::identity(status.to_string(), excerpt(body));
    };

    let raw = envelope.error.message;
    let (code, detail) = match raw.split_once(':') {
        Some((code, detail)) => (code.trim().to_string(), detail.trim().to_string()),
        None => (raw.trim().to_string(), raw.trim().to_string()),
    };

    if code == EMAIL_EXISTS {
        AppError::EmailAlreadyInUse
    } else {
        AppError::identity(code, detail)
    }
}

#[async_trait]
impl IdentityProvider for FirebaseIdentity {
    async fn create_account(&self, email: &str, password: &str) -> Result<AuthSession> {
        let request = SignUpRequest {
            email,
            password,
            return_secure_token: true,
        };
        let response: SignUpResponse = self.call("signUp", &request).await?;
        log::info!("Created identity account {}", response.local_id);

        Ok(AuthSession {
            uid: response.local_id,
            email: if response.email.is_empty() {
                email.to_string()
            } else {
                response.email
            },
            id_token: response.id_token,
            refresh_token: response.refresh_token,
            display_name: None,
        })
    }

    async fn update_profile(&self, session: &mut AuthSession, display_name: &str) -> Result<()> {
        let request = UpdateRequest {
            id_token: &session.id_token,
            display_name,
            return_secure_token: false,
        };
        let response: UpdateResponse = self.call("update", &request).await?;
        session.display_name = response.display_name.or_else(|| Some(display_name.to_string()));
        Ok(())
    }

    /// Tokens live only in the session value, so dropping it signs out.
    async fn sign_out(&self, session: AuthSession) -> Result<()> {
        log::debug!("Signed out {}", session.uid);
        Ok(())
    }
}
