// src/error.rs

//! Unified error handling for the Lost and Found client.

use std::fmt;

use thiserror::Error;

use crate::models::FormError;
use crate::services::registration::RegistrationError;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Backend answered with a non-success status
    #[error("Backend returned {status}: {message}")]
    Backend { status: u16, message: String },

    /// Identity provider rejected a request
    #[error("Identity provider error {code}: {message}")]
    Identity { code: String, message: String },

    /// Identity provider already has an account for this email
    #[error("Email is already registered")]
    EmailAlreadyInUse,

    /// A listing or search ended in the error state
    #[error("Listing failed: {0}")]
    Listing(String),

    /// Client-side form check failed
    #[error(transparent)]
    Form(#[from] FormError),

    /// A registration step failed
    #[error(transparent)]
    Registration(#[from] RegistrationError),

    /// The owning view was torn down while the request was in flight
    #[error("Operation cancelled")]
    Cancelled,
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a backend status error.
    pub fn backend(status: u16, message: impl fmt::Display) -> Self {
        Self::Backend {
            status,
            message: message.to_string(),
        }
    }

    /// Create an identity provider error.
    pub fn identity(code: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Identity {
            code: code.into(),
            message: message.to_string(),
        }
    }

    /// Whether this error only reports a cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
