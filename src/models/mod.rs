// src/models/mod.rs

//! Domain models for the Lost and Found client.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod item;
mod location;
mod user;

// Re-export all public types
pub use config::{
    BackendConfig, Config, DisplayConfig, IdentityConfig, LoggingConfig, PathsConfig,
    RegistrationConfig, ENV_BACKEND_URL, ENV_IDENTITY_API_KEY, ENV_LOG_LEVEL,
};
pub use item::{Item, ItemKind, SearchQuery};
pub use location::{Division, LocationTable, Zilla};
pub use user::{
    FormError, RegistrationForm, SaveInfoResponse, UserProfile, is_strong_password,
    is_valid_email,
};

/// Response envelope used by every backend read endpoint.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}
