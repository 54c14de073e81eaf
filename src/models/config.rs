//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Environment variable overriding `backend.base_url`.
pub const ENV_BACKEND_URL: &str = "LOSTFOUND_BACKEND_URL";
/// Environment variable overriding `identity.api_key`.
pub const ENV_IDENTITY_API_KEY: &str = "LOSTFOUND_IDENTITY_API_KEY";
/// Environment variable overriding `logging.level`.
pub const ENV_LOG_LEVEL: &str = "LOSTFOUND_LOG_LEVEL";

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// REST backend connection settings
    #[serde(default)]
    pub backend: BackendConfig,

    /// Identity provider settings
    #[serde(default)]
    pub identity: IdentityConfig,

    /// Registration form limits
    #[serde(default)]
    pub registration: RegistrationConfig,

    /// Data file locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Console rendering settings
    #[serde(default)]
    pub display: DisplayConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Apply overrides from a variable lookup (normally the process environment).
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = non_empty(ENV_BACKEND_URL) {
            self.backend.base_url = url;
        }
        if let Some(key) = non_empty(ENV_IDENTITY_API_KEY) {
            self.identity.api_key = key;
        }
        if let Some(level) = non_empty(ENV_LOG_LEVEL) {
            self.logging.level = level;
        }
        self
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.backend.base_url.trim().is_empty() {
            return Err(AppError::validation("backend.base_url is empty"));
        }
        url::Url::parse(&self.backend.base_url).map_err(|e| {
            AppError::validation(format!(
                "backend.base_url '{}' is not a valid URL: {e}",
                self.backend.base_url
            ))
        })?;
        if self.backend.user_agent.trim().is_empty() {
            return Err(AppError::validation("backend.user_agent is empty"));
        }
        if self.backend.timeout_secs == 0 {
            return Err(AppError::validation("backend.timeout_secs must be > 0"));
        }
        url::Url::parse(&self.identity.base_url).map_err(|e| {
            AppError::validation(format!("identity.base_url is not a valid URL: {e}"))
        })?;
        if self.registration.max_image_bytes == 0 {
            return Err(AppError::validation(
                "registration.max_image_bytes must be > 0",
            ));
        }
        Ok(())
    }
}

/// REST backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL every endpoint is resolved against
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Identity provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Identity Toolkit REST root
    #[serde(default = "defaults::identity_url")]
    pub base_url: String,

    /// Web API key of the project; required only for registration
    #[serde(default)]
    pub api_key: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::identity_url(),
            api_key: String::new(),
        }
    }
}

/// Registration form limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationConfig {
    /// Largest accepted profile image, in bytes
    #[serde(default = "defaults::max_image_bytes")]
    pub max_image_bytes: u64,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            max_image_bytes: defaults::max_image_bytes(),
        }
    }
}

/// Data file locations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Location table replacing the bundled one
    #[serde(default)]
    pub locations_file: Option<String>,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

/// Console rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Line template for listings, see [`crate::models::Item::format`]
    #[serde(default = "defaults::item_template")]
    pub item_template: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            item_template: defaults::item_template(),
        }
    }
}

mod defaults {
    pub fn base_url() -> String {
        "http://localhost:5000".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; lostfound/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn identity_url() -> String {
        "https://identitytoolkit.googleapis.com/v1".into()
    }
    pub fn max_image_bytes() -> u64 {
        10 * 1024 * 1024
    }
    pub fn log_level() -> String {
        "info".into()
    }
    pub fn item_template() -> String {
        "[{kind}] {category} @ {location} ({date}) {id}".into()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_base_url() {
        let mut config = Config::default();
        config.backend.base_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.backend.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [backend]
            base_url = "https://lost-found.example.com/api"
            "#,
        )
        .unwrap();
        assert_eq!(config.backend.base_url, "https://lost-found.example.com/api");
        assert_eq!(config.backend.timeout_secs, 30);
        assert_eq!(config.registration.max_image_bytes, 10 * 1024 * 1024);
        assert!(config.identity.api_key.is_empty());
    }

    #[test]
    fn overrides_replace_non_empty_values_only() {
        let vars: HashMap<&str, &str> = [
            (ENV_BACKEND_URL, "https://api.example.org"),
            (ENV_IDENTITY_API_KEY, "  "),
        ]
        .into_iter()
        .collect();

        let config =
            Config::default().with_overrides(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(config.backend.base_url, "https://api.example.org");
        assert!(config.identity.api_key.is_empty());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn load_or_default_falls_back_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(dir.path().join("missing.toml"));
        assert_eq!(config.backend.base_url, "http://localhost:5000");
    }
}
