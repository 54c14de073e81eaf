// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use reqwest::Response;
use serde::de::DeserializeOwned;

use crate::error::{AppError, Result};
use crate::models::BackendConfig;

/// Longest error body excerpt carried in an error message.
const ERROR_BODY_LIMIT: usize = 200;

/// Create a configured asynchronous HTTP client.
pub fn create_client(config: &BackendConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Decode a JSON body, turning non-success statuses into [`AppError::Backend`].
pub async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(AppError::backend(status.as_u16(), excerpt(&body)));
    }
    Ok(serde_json::from_str(&body)?)
}

/// Shorten a response body for log and error output.
pub fn excerpt(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= ERROR_BODY_LIMIT {
        return trimmed.to_string();
    }
    let cut: String = trimmed.chars().take(ERROR_BODY_LIMIT).collect();
    format!("{cut}…")
}
