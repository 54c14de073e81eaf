//! Registration form and user profile structures.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

static PASSWORD_CHARSET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9@$!%*?&]{8,}$").expect("valid password regex"));

/// Characters that count as "special" for password strength.
pub const PASSWORD_SPECIALS: &str = "@$!%*?&";

/// Client-side rejection of a registration form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Password doesn't match")]
    PasswordMismatch,

    #[error("All fields are required (missing: {})", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Invalid email address")]
    InvalidEmail,

    #[error(
        "Password must be at least 8 characters long and contain at least one uppercase letter, one lowercase letter, one digit, and one special character."
    )]
    WeakPassword,

    #[error("Unknown location: {0}")]
    UnknownLocation(String),

    #[error("Image size is too large. Please upload an image smaller than {}.", size_label(.limit))]
    ImageTooLarge { size: u64, limit: u64 },

    #[error("Unsupported image file: {0}")]
    UnsupportedImage(String),
}

/// Human-readable byte size: whole MB or KB where exact, bytes below 1 KB.
fn size_label(bytes: &u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * KB;

    match *bytes {
        b if b >= MB && b % MB == 0 => format!("{} MB", b / MB),
        b if b >= MB => format!("{:.1} MB", b as f64 / MB as f64),
        b if b >= KB && b % KB == 0 => format!("{} KB", b / KB),
        b if b >= KB => format!("{:.1} KB", b as f64 / KB as f64),
        b => format!("{b} bytes"),
    }
}

/// Values entered on the sign-up form.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub fullname: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub division: String,
    pub zilla: String,
    pub upzilla: String,
    pub village: String,
    /// Profile picture as a `data:` URL
    pub image: Option<String>,
    pub password: String,
    pub confirm_password: String,
}

impl RegistrationForm {
    /// Run every client-side check, stopping at the first failure.
    ///
    /// Order: password confirmation, required fields, email shape,
    /// password strength.
    pub fn validate(&self) -> Result<(), FormError> {
        if self.password != self.confirm_password {
            return Err(FormError::PasswordMismatch);
        }

        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(FormError::MissingFields(missing));
        }

        if !is_valid_email(self.email.trim()) {
            return Err(FormError::InvalidEmail);
        }

        if !is_strong_password(&self.password) {
            return Err(FormError::WeakPassword);
        }

        Ok(())
    }

    /// Names of required fields left blank, in form order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let image = self.image.as_deref().unwrap_or("");
        [
            ("fullname", self.fullname.as_str()),
            ("username", self.username.as_str()),
            ("email", self.email.as_str()),
            ("password", self.password.as_str()),
            ("confirmPassword", self.confirm_password.as_str()),
            ("phone", self.phone.as_str()),
            ("division", self.division.as_str()),
            ("zilla", self.zilla.as_str()),
            ("upzilla", self.upzilla.as_str()),
            ("village", self.village.as_str()),
            ("image", image),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

impl fmt::Debug for RegistrationForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationForm")
            .field("fullname", &self.fullname)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("phone", &self.phone)
            .field("division", &self.division)
            .field("zilla", &self.zilla)
            .field("upzilla", &self.upzilla)
            .field("village", &self.village)
            .field("image", &self.image.as_ref().map(|i| i.len()))
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Whether `email` has the `local@domain.tld` shape.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

/// Whether `password` meets the strength policy.
pub fn is_strong_password(password: &str) -> bool {
    PASSWORD_CHARSET.is_match(password)
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SPECIALS.contains(c))
}

/// Profile record persisted by `POST /user/saveInfo`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    /// Identifier issued by the identity provider
    pub firebase_uid: String,
    pub fullname: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub division: String,
    pub zilla: String,
    pub upzilla: String,
    pub village: String,
    pub image: String,
    pub password: String,
    #[serde(rename = "confirmPassword")]
    pub confirm_password: String,
}

impl UserProfile {
    /// Build the backend payload for an account created with `uid`.
    pub fn from_form(uid: impl Into<String>, form: &RegistrationForm) -> Self {
        Self {
            firebase_uid: uid.into(),
            fullname: form.fullname.trim().to_string(),
            username: form.username.trim().to_string(),
            email: form.email.trim().to_string(),
            phone: form.phone.trim().to_string(),
            division: form.division.clone(),
            zilla: form.zilla.clone(),
            upzilla: form.upzilla.clone(),
            village: form.village.trim().to_string(),
            image: form.image.clone().unwrap_or_default(),
            password: form.password.clone(),
            confirm_password: form.confirm_password.clone(),
        }
    }
}

/// Backend answer to a profile save.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SaveInfoResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}
