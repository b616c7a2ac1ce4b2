//! Two-Factor Authentication Service
//!
//! TOTP enrollment and verification per RFC 6238: SHA-1, 6 digits, 30 second
//! steps, ±1 step tolerance for clock drift.

use std::sync::Arc;

use totp_rs::{Algorithm, Secret, TOTP};
use uuid::Uuid;

use crate::models::requests::{MessageResponse, TwoFactorSetupResponse};
use crate::service::{ServiceError, ServiceResult};
use crate::store::UserStore;

/// Manages per-user TOTP secrets and code verification
pub struct TwoFactorService {
    store: Arc<dyn UserStore>,
    issuer: String,
}

impl TwoFactorService {
    /// `issuer` is the application name shown by authenticator apps.
    pub fn new(store: Arc<dyn UserStore>, issuer: String) -> Self {
        Self { store, issuer }
    }

    /// Enrolls a user: generates a fresh 160-bit secret, persists it, and
    /// returns the QR code (PNG data URL) plus the raw base32 secret for
    /// manual entry. The caller must protect both in transit.
    pub async fn enable(&self, user_id: Uuid) -> ServiceResult<TwoFactorSetupResponse> {
        let user = self
            .store
            .find_by_id(user_id)
            .await?
            .ok_or(ServiceError::UserNotFound)?;

        let secret = Secret::generate_secret();
        let secret_bytes = secret
            .to_bytes()
            .map_err(|e| ServiceError::TwoFactor(format!("secret generation: {e}")))?;

        let totp = self.build_totp(secret_bytes, user.id)?;

        let qr = totp
            .get_qr_base64()
            .map_err(|e| ServiceError::TwoFactor(format!("QR rendering: {e}")))?;
        let qr_code_url = format!("data:image/png;base64,{qr}");
        let secret_base32 = totp.get_secret_base32();

        self.store
            .save_two_factor_secret(user.id, &secret_base32)
            .await?;

        Ok(TwoFactorSetupResponse {
            qr_code_url,
            secret: secret_base32,
        })
    }

    /// Verifies a submitted code against the stored secret.
    pub async fn verify(&self, user_id: Uuid, code: &str) -> ServiceResult<MessageResponse> {
        let user = self
            .store
            .find_by_id(user_id)
            .await?
            .ok_or(ServiceError::UserNotFound)?;

        let secret = user
            .two_factor_secret
            .as_deref()
            .ok_or(ServiceError::TwoFactorNotEnrolled)?;

        let secret_bytes = Secret::Encoded(secret.to_string())
            .to_bytes()
            .map_err(|e| ServiceError::TwoFactor(format!("stored secret: {e}")))?;

        let totp = self.build_totp(secret_bytes, user.id)?;
        if !totp.check_current(code).unwrap_or(false) {
            return Err(ServiceError::InvalidTwoFactorCode);
        }

        Ok(MessageResponse::new("2FA verification successful"))
    }

    /// Disables two-factor: clears the secret, the flag, and any backup codes.
    pub async fn disable(&self, user_id: Uuid) -> ServiceResult<MessageResponse> {
        self.store
            .find_by_id(user_id)
            .await?
            .ok_or(ServiceError::UserNotFound)?;

        self.store.clear_two_factor(user_id).await?;

        Ok(MessageResponse::new("Two-factor authentication disabled."))
    }

    fn build_totp(&self, secret_bytes: Vec<u8>, user_id: Uuid) -> ServiceResult<TOTP> {
        TOTP::new(
            Algorithm::SHA1,
            6,
            1,
            30,
            secret_bytes,
            Some(self.issuer.clone()),
            user_id.to_string(),
        )
        .map_err(|e| ServiceError::TwoFactor(format!("TOTP init: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewUser, UserRole};
    use crate::store::{InMemoryUserStore, UserStore};

    async fn service_with_user() -> (TwoFactorService, Uuid) {
        let store = Arc::new(InMemoryUserStore::new());
        let user = store
            .create(NewUser {
                name: "Alice Doe".to_string(),
                email: "alice@example.com".to_string(),
                password_hash: "$2b$10$hash".to_string(),
                profile_picture_url: None,
                role: UserRole::User,
            })
            .await
            .unwrap();

        let service = TwoFactorService::new(store, "Account Service".to_string());
        (service, user.id)
    }

    #[tokio::test]
    async fn test_enable_returns_qr_and_secret() {
        let (service, user_id) = service_with_user().await;
        let setup = service.enable(user_id).await.unwrap();

        assert!(setup.qr_code_url.starts_with("data:image/png;base64,"));
        assert!(!setup.secret.is_empty());
    }

    #[tokio::test]
    async fn test_verify_accepts_current_code() {
        let (service, user_id) = service_with_user().await;
        let setup = service.enable(user_id).await.unwrap();

        // Generate the expected code from the secret handed back to the user.
        let totp = TOTP::new(
            Algorithm::SHA1,
            6,
            1,
            30,
            Secret::Encoded(setup.secret).to_bytes().unwrap(),
            Some("Account Service".to_string()),
            user_id.to_string(),
        )
        .unwrap();
        let code = totp.generate_current().unwrap();

        let result = service.verify(user_id, &code).await.unwrap();
        assert_eq!(result.message, "2FA verification successful");
    }

    #[tokio::test]
    async fn test_verify_rejects_code_from_wrong_secret() {
        let (service, user_id) = service_with_user().await;
        service.enable(user_id).await.unwrap();

        let wrong_secret = Secret::generate_secret();
        let foreign = TOTP::new(
            Algorithm::SHA1,
            6,
            1,
            30,
            wrong_secret.to_bytes().unwrap(),
            Some("Account Service".to_string()),
            user_id.to_string(),
        )
        .unwrap();
        let code = foreign.generate_current().unwrap();

        let result = service.verify(user_id, &code).await;
        assert!(matches!(result, Err(ServiceError::InvalidTwoFactorCode)));
    }

    #[tokio::test]
    async fn test_verify_without_enrollment_is_not_found() {
        let (service, user_id) = service_with_user().await;

        let result = service.verify(user_id, "123456").await;
        assert!(matches!(result, Err(ServiceError::TwoFactorNotEnrolled)));
    }

    #[tokio::test]
    async fn test_disable_clears_enrollment() {
        let (service, user_id) = service_with_user().await;
        service.enable(user_id).await.unwrap();

        service.disable(user_id).await.unwrap();

        let result = service.verify(user_id, "123456").await;
        assert!(matches!(result, Err(ServiceError::TwoFactorNotEnrolled)));
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_found() {
        let (service, _) = service_with_user().await;

        let result = service.enable(Uuid::new_v4()).await;
        assert!(matches!(result, Err(ServiceError::UserNotFound)));
    }
}
