// src/services/registration.rs

//! Account registration flow.
//!
//! Validates the form locally, then creates the identity account, sets its
//! display name, persists the profile and finally signs the fresh session
//! out. Any failing step aborts the rest.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::error::AppError;
use crate::models::{FormError, LocationTable, RegistrationForm, UserProfile};
use crate::services::backend::ProfileStore;
use crate::services::identity::IdentityProvider;
use crate::utils::cancellable;

/// Message shown once the account and profile both exist.
pub const CONFIRMATION_MESSAGE: &str =
    "Email Verification link has been sent to your email address.";

/// Why a registration did not complete.
#[derive(Error, Debug)]
pub enum RegistrationError {
    /// Rejected before any network call
    #[error(transparent)]
    Invalid(#[from] FormError),

    /// Another submission is still running
    #[error("A registration is already in progress")]
    InProgress,

    #[error("Email is already registered. Try logging in.")]
    EmailInUse,

    /// Identity account could not be created
    #[error("An error occurred: {0}")]
    Account(#[source] Box<AppError>),

    /// Account exists but its display name could not be set
    #[error("Error updating user profile for {uid}: {source}")]
    Profile {
        uid: String,
        #[source]
        source: Box<AppError>,
    },

    /// Backend refused the profile; the identity account is orphaned
    #[error("Registration Failed: {message}")]
    Rejected { uid: String, message: String },

    /// Profile save failed in transport; the identity account is orphaned
    #[error("Something went wrong while saving your data.")]
    Save {
        uid: String,
        #[source]
        source: Box<AppError>,
    },

    /// The registrar was torn down mid-flow
    #[error("Registration cancelled")]
    Cancelled { uid: Option<String> },
}

impl RegistrationError {
    /// Identity account left behind without a profile, if any.
    pub fn orphaned_uid(&self) -> Option<&str> {
        match self {
            Self::Profile { uid, .. } | Self::Rejected { uid, .. } | Self::Save { uid, .. } => {
                Some(uid)
            }
            Self::Cancelled { uid } => uid.as_deref(),
            _ => None,
        }
    }
}

/// Outcome of a completed registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationReceipt {
    pub uid: String,
    pub email: String,
    pub message: String,
}

/// Runs the registration flow against an identity provider and a profile store.
pub struct Registrar {
    identity: Arc<dyn IdentityProvider>,
    profiles: Arc<dyn ProfileStore>,
    locations: Option<LocationTable>,
    submitting: AtomicBool,
    cancel: CancellationToken,
}

/// Clears the submitting flag however the flow ends.
struct SubmitGuard<'a>(&'a AtomicBool);

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Registrar {
    pub fn new(identity: Arc<dyn IdentityProvider>, profiles: Arc<dyn ProfileStore>) -> Self {
        Self {
            identity,
            profiles,
            locations: None,
            submitting: AtomicBool::new(false),
            cancel: CancellationToken::new(),
        }
    }

    /// Also require the form's location to exist in `table`.
    pub fn with_locations(mut self, table: LocationTable) -> Self {
        self.locations = Some(table);
        self
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    /// Abort in-flight requests; the registrar accepts no further work.
    pub fn teardown(&self) {
        self.cancel.cancel();
    }

    /// Every client-side check, without touching the network.
    pub fn check(&self, form: &RegistrationForm) -> Result<(), FormError> {
        form.validate()?;
        if let Some(table) = &self.locations {
            if !table.contains(&form.division, &form.zilla, &form.upzilla) {
                return Err(FormError::UnknownLocation(format!(
                    "{} / {} / {}",
                    form.division, form.zilla, form.upzilla
                )));
            }
        }
        Ok(())
    }

    /// Register a new user.
    pub async fn register(
        &self,
        form: &RegistrationForm,
    ) -> Result<RegistrationReceipt, RegistrationError> {
        if self
            .submitting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(RegistrationError::InProgress);
        }
        let _guard = SubmitGuard(&self.submitting);

        if let Err(e) = self.check(form) {
            log::warn!("Registration form rejected: {e}");
            return Err(e.into());
        }

        let email = form.email.trim();
        let mut session =
            match cancellable(&self.cancel, self.identity.create_account(email, &form.password))
                .await
            {
                Ok(session) => session,
                Err(AppError::EmailAlreadyInUse) => return Err(RegistrationError::EmailInUse),
                Err(AppError::Cancelled) => return Err(RegistrationError::Cancelled { uid: None }),
                Err(e) => return Err(RegistrationError::Account(Box::new(e))),
            };
        let uid = session.uid.clone();

        let username = form.username.trim();
        match cancellable(&self.cancel, self.identity.update_profile(&mut session, username)).await
        {
            Ok(()) => log::info!("User profile updated for {uid}"),
            Err(AppError::Cancelled) => return Err(self.orphaned_by_cancel(uid)),
            Err(e) => {
                log::error!("Error updating user profile: {e}");
                return Err(RegistrationError::Profile {
                    uid,
                    source: Box::new(e),
                });
            }
        }

        let profile = UserProfile::from_form(uid.clone(), form);
        let saved = cancellable(&self.cancel, self.profiles.save_user_info(&profile)).await;
        match saved {
            Ok(response) if response.success => {}
            Ok(response) => {
                let message = response
                    .message
                    .unwrap_or_else(|| "Registration failed".to_string());
                log::warn!("Backend rejected profile, identity account {uid} has no profile");
                return Err(RegistrationError::Rejected { uid, message });
            }
            Err(AppError::Cancelled) => return Err(self.orphaned_by_cancel(uid)),
            Err(e) => {
                log::error!("Error while saving profile for {uid}: {e}");
                return Err(RegistrationError::Save {
                    uid,
                    source: Box::new(e),
                });
            }
        }

        if let Err(e) = self.identity.sign_out(session).await {
            log::warn!("Sign-out after registration failed: {e}");
        }

        Ok(RegistrationReceipt {
            uid,
            email: email.to_string(),
            message: CONFIRMATION_MESSAGE.to_string(),
        })
    }

    fn orphaned_by_cancel(&self, uid: String) -> RegistrationError {
        log::warn!("Registration cancelled, identity account {uid} has no profile");
        RegistrationError::Cancelled { uid: Some(uid) }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use super::*;
    use crate::error::Result;
    use crate::models::{Division, SaveInfoResponse, Zilla};
    use crate::services::identity::AuthSession;

    #[derive(Default)]
    struct FakeIdentity {
        email_taken: bool,
        /// (entered, release): announce account creation, then wait
        gate: Option<(Arc<Notify>, Arc<Notify>)>,
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl IdentityProvider for FakeIdentity {
        async fn create_account(&self, email: &str, _password: &str) -> Result<AuthSession> {
            self.calls.lock().unwrap().push(format!("create:{email}"));
            if let Some((entered, release)) = &self.gate {
                entered.notify_one();
                release.notified().await;
            }
            if self.email_taken {
                return Err(AppError::EmailAlreadyInUse);
            }
            Ok(AuthSession {
                uid: "uid-1".to_string(),
                email: email.to_string(),
                id_token: "id-token".to_string(),
                refresh_token: "refresh-token".to_string(),
                display_name: None,
            })
        }

        async fn update_profile(&self, session: &mut AuthSession, name: &str) -> Result<()> {
            self.calls.lock().unwrap().push(format!("update:{name}"));
            session.display_name = Some(name.to_string());
            Ok(())
        }

        async fn sign_out(&self, session: AuthSession) -> Result<()> {
            self.calls.lock().unwrap().push(format!("signout:{}", session.uid));
            Ok(())
        }
    }

    struct FakeStore {
        response: SaveInfoResponse,
        saved: Mutex<Vec<UserProfile>>,
    }

    impl FakeStore {
        fn answering(success: bool, message: Option<&str>) -> Self {
            Self {
                response: SaveInfoResponse {
                    success,
                    message: message.map(str::to_string),
                },
                saved: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ProfileStore for FakeStore {
        async fn save_user_info(&self, profile: &UserProfile) -> Result<SaveInfoResponse> {
            self.saved.lock().unwrap().push(profile.clone());
            Ok(self.response.clone())
        }
    }

    fn form() -> RegistrationForm {
        RegistrationForm {
            fullname: "Karim Ahmed".to_string(),
            username: "karim".to_string(),
            email: "karim@example.com".to_string(),
            phone: "01811111111".to_string(),
            division: "Khulna".to_string(),
            zilla: "Jessore".to_string(),
            upzilla: "Sharsha".to_string(),
            village: "Benapole".to_string(),
            image: Some("data:image/jpeg;base64,/9j/".to_string()),
            password: "Passw0rd!".to_string(),
            confirm_password: "Passw0rd!".to_string(),
        }
    }

    fn setup(
        identity: FakeIdentity,
        store: FakeStore,
    ) -> (Registrar, Arc<FakeIdentity>, Arc<FakeStore>) {
        let identity = Arc::new(identity);
        let store = Arc::new(store);
        let registrar = Registrar::new(identity.clone(), store.clone());
        (registrar, identity, store)
    }

    #[tokio::test]
    async fn test_successful_registration() {
        let (registrar, identity, store) =
            setup(FakeIdentity::default(), FakeStore::answering(true, None));

        let receipt = registrar.register(&form()).await.unwrap();
        assert_eq!(receipt.uid, "uid-1");
        assert_eq!(receipt.message, CONFIRMATION_MESSAGE);
        assert_eq!(
            *identity.calls.lock().unwrap(),
            vec![
                "create:karim@example.com",
                "update:karim",
                "signout:uid-1"
            ]
        );

        let saved = store.saved.lock().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].firebase_uid, "uid-1");
        assert!(!registrar.is_submitting());
    }

    #[tokio::test]
    async fn test_mismatched_passwords_never_touch_network() {
        let (registrar, identity, store) =
            setup(FakeIdentity::default(), FakeStore::answering(true, None));
        let mut form = form();
        form.confirm_password = "Passw0rd?".to_string();

        let err = registrar.register(&form).await.unwrap_err();
        assert!(matches!(
            err,
            RegistrationError::Invalid(FormError::PasswordMismatch)
        ));
        assert!(identity.calls.lock().unwrap().is_empty());
        assert!(store.saved.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_password_without_digit_never_touches_network() {
        let (registrar, identity, _store) =
            setup(FakeIdentity::default(), FakeStore::answering(true, None));
        let mut form = form();
        form.password = "Password!".to_string();
        form.confirm_password = "Password!".to_string();

        let err = registrar.register(&form).await.unwrap_err();
        assert!(matches!(
            err,
            RegistrationError::Invalid(FormError::WeakPassword)
        ));
        assert!(identity.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_email_stops_before_profile() {
        let identity = FakeIdentity {
            email_taken: true,
            ..FakeIdentity::default()
        };
        let (registrar, identity, store) = setup(identity, FakeStore::answering(true, None));

        let err = registrar.register(&form()).await.unwrap_err();
        assert!(matches!(err, RegistrationError::EmailInUse));
        assert_eq!(err.to_string(), "Email is already registered. Try logging in.");
        assert_eq!(identity.calls.lock().unwrap().len(), 1);
        assert!(store.saved.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_backend_rejection_reports_orphaned_account() {
        let (registrar, identity, _store) = setup(
            FakeIdentity::default(),
            FakeStore::answering(false, Some("Username already taken")),
        );

        let err = registrar.register(&form()).await.unwrap_err();
        assert_eq!(err.orphaned_uid(), Some("uid-1"));
        assert_eq!(err.to_string(), "Registration Failed: Username already taken");
        assert!(
            !identity
                .calls
                .lock()
                .unwrap()
                .iter()
                .any(|c| c.starts_with("signout"))
        );
    }

    #[tokio::test]
    async fn test_unknown_location_rejected_with_table() {
        let table = LocationTable::new(vec![Division {
            division: "Khulna".to_string(),
            zillas: vec![Zilla {
                name: "Jessore".to_string(),
                upzillas: vec!["Abhaynagar".to_string()],
            }],
        }]);
        let (registrar, identity, _store) =
            setup(FakeIdentity::default(), FakeStore::answering(true, None));
        let registrar = registrar.with_locations(table);

        let err = registrar.register(&form()).await.unwrap_err();
        assert!(matches!(
            err,
            RegistrationError::Invalid(FormError::UnknownLocation(_))
        ));
        assert!(identity.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_second_submission_refused_while_in_flight() {
        let entered = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let identity = FakeIdentity {
            gate: Some((entered.clone(), release.clone())),
            ..FakeIdentity::default()
        };
        let (registrar, identity, store) = setup(identity, FakeStore::answering(true, None));
        let form = form();

        let (first, second) = tokio::join!(registrar.register(&form), async {
            entered.notified().await;
            assert!(registrar.is_submitting());
            let second = registrar.register(&form).await;
            release.notify_one();
            second
        });

        assert!(matches!(second, Err(RegistrationError::InProgress)));
        assert_eq!(first.unwrap().uid, "uid-1");
        assert!(!registrar.is_submitting());
        assert_eq!(
            identity
                .calls
                .lock()
                .unwrap()
                .iter()
                .filter(|c| c.starts_with("create"))
                .count(),
            1
        );
        assert_eq!(store.saved.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_submission_clears_in_flight_flag() {
        let identity = FakeIdentity {
            email_taken: true,
            ..FakeIdentity::default()
        };
        let (registrar, _identity, _store) = setup(identity, FakeStore::answering(true, None));

        assert!(registrar.register(&form()).await.is_err());
        assert!(!registrar.is_submitting());
        assert!(matches!(
            registrar.register(&form()).await,
            Err(RegistrationError::EmailInUse)
        ));
    }

    #[tokio::test]
    async fn test_torn_down_registrar_creates_nothing() {
        let (registrar, identity, _store) =
            setup(FakeIdentity::default(), FakeStore::answering(true, None));
        registrar.teardown();

        let err = registrar.register(&form()).await.unwrap_err();
        assert!(matches!(err, RegistrationError::Cancelled { uid: None }));
        assert!(identity.calls.lock().unwrap().is_empty());
    }
}
