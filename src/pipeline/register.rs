// src/pipeline/register.rs

//! Account registration pipeline.

use std::path::Path;
use std::sync::Arc;

use crate::error::Result;
use crate::models::{Config, LocationTable, RegistrationForm};
use crate::services::{IdentityProvider, ProfileStore, RegistrationReceipt, Registrar};
use crate::utils::{console, image};

/// Attach the profile picture at `image_path` and register the account.
///
/// Every failure is shown as an alert before it is returned.
pub async fn run_register(
    config: &Config,
    locations: LocationTable,
    identity: Arc<dyn IdentityProvider>,
    profiles: Arc<dyn ProfileStore>,
    mut form: RegistrationForm,
    image_path: &Path,
) -> Result<RegistrationReceipt> {
    console::header("Create a new account");

    form.image = match image::encode_image(image_path, config.registration.max_image_bytes).await
    {
        Ok(data_url) => Some(data_url),
        Err(e) => {
            console::alert(&e.to_string());
            return Err(e);
        }
    };

    let registrar = Registrar::new(identity, profiles).with_locations(locations);
    let receipt = match registrar.register(&form).await {
        Ok(receipt) => receipt,
        Err(e) => {
            if let Some(uid) = e.orphaned_uid() {
                log::warn!("Identity account {uid} was created without a saved profile");
            }
            console::alert(&e.to_string());
            return Err(e.into());
        }
    };

    console::success(&receipt.message);
    console::summary(
        "Registration",
        &[
            ("email", receipt.email.clone()),
            ("uid", receipt.uid.clone()),
        ],
    );
    Ok(receipt)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::error::AppError;
    use crate::models::{FormError, SaveInfoResponse, UserProfile};
    use crate::services::AuthSession;

    struct OkIdentity;

    #[async_trait]
    impl IdentityProvider for OkIdentity {
        async fn create_account(&self, email: &str, _password: &str) -> Result<AuthSession> {
            Ok(AuthSession {
                uid: "uid-7".to_string(),
                email: email.to_string(),
                id_token: String::new(),
                refresh_token: String::new(),
                display_name: None,
            })
        }

        async fn update_profile(&self, _session: &mut AuthSession, _name: &str) -> Result<()> {
            Ok(())
        }

        async fn sign_out(&self, _session: AuthSession) -> Result<()> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingStore {
        saved: Mutex<Vec<UserProfile>>,
    }

    #[async_trait]
    impl ProfileStore for RecordingStore {
        async fn save_user_info(&self, profile: &UserProfile) -> Result<SaveInfoResponse> {
            self.saved.lock().unwrap().push(profile.clone());
            Ok(SaveInfoResponse {
                success: true,
                message: None,
            })
        }
    }

    fn form() -> RegistrationForm {
        RegistrationForm {
            fullname: "Nusrat Jahan".to_string(),
            username: "nusrat".to_string(),
            email: "nusrat@example.com".to_string(),
            phone: "01900000000".to_string(),
            division: "Khulna".to_string(),
            zilla: "Jessore".to_string(),
            upzilla: "Sharsha".to_string(),
            village: "Benapole".to_string(),
            image: None,
            password: "Strong@1".to_string(),
            confirm_password: "Strong@1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_image_is_attached_to_saved_profile() {
        let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        file.write_all(&[0x89, b'P', b'N', b'G']).unwrap();

        let store = Arc::new(RecordingStore::default());
        let receipt = run_register(
            &Config::default(),
            LocationTable::bundled().unwrap(),
            Arc::new(OkIdentity),
            store.clone(),
            form(),
            file.path(),
        )
        .await
        .unwrap();

        assert_eq!(receipt.uid, "uid-7");
        let saved = store.saved.lock().unwrap();
        assert!(saved[0].image.starts_with("data:image/png;base64,"));
    }

    #[tokio::test]
    async fn test_oversized_image_stops_registration() {
        let mut file = tempfile::Builder::new().suffix(".jpg").tempfile().unwrap();
        file.write_all(&[0u8; 64]).unwrap();
        let mut config = Config::default();
        config.registration.max_image_bytes = 16;

        let store = Arc::new(RecordingStore::default());
        let err = run_register(
            &config,
            LocationTable::bundled().unwrap(),
            Arc::new(OkIdentity),
            store.clone(),
            form(),
            file.path(),
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            AppError::Form(FormError::ImageTooLarge { size: 64, limit: 16 })
        ));
        assert!(store.saved.lock().unwrap().is_empty());
    }
}
