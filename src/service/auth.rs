//! Auth Orchestrator
//!
//! Composes the store, hasher, token service, notifier, reset issuer, and
//! two-factor manager into the account use cases. All collaborators are
//! injected at construction; the service holds no state of its own.

use std::sync::Arc;

use log::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::models::requests::{
    LoginRequest, LoginResponse, MessageResponse, RegisterRequest, RegisterResponse,
    RegisteredUser, TwoFactorSetupResponse,
};
use crate::models::{NewUser, UserRole};
use crate::service::{
    JwtService, Notifier, PasswordHasher, PasswordResetService, ServiceError, ServiceResult,
    TwoFactorService,
};
use crate::store::{StoreError, UserStore};
use crate::utils::validation::{initials_avatar_url, normalize_email};

/// Orchestrates login, registration, password reset, and two-factor flows
pub struct AuthService {
    store: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    jwt: Arc<JwtService>,
    notifier: Arc<dyn Notifier>,
    reset: PasswordResetService,
    two_factor: TwoFactorService,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn UserStore>,
        hasher: PasswordHasher,
        jwt: Arc<JwtService>,
        notifier: Arc<dyn Notifier>,
        reset: PasswordResetService,
        two_factor: TwoFactorService,
    ) -> Self {
        Self {
            store,
            hasher,
            jwt,
            notifier,
            reset,
            two_factor,
        }
    }

    /// Authenticates credentials and issues a session token.
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<LoginResponse> {
        request
            .validate()
            .map_err(|e| ServiceError::Validation(e.to_string()))?;

        let user = self
            .store
            .find_by_email(&normalize_email(&request.email))
            .await?
            .ok_or(ServiceError::UserNotFound)?;

        if !self.hasher.verify(&request.password, &user.password_hash) {
            return Err(ServiceError::InvalidPassword);
        }

        self.store.touch_last_login(user.id).await?;

        let access_token = self
            .jwt
            .sign(user.id)
            .map_err(|e| ServiceError::Token(e.to_string()))?;

        info!("user {} logged in", user.id);
        Ok(LoginResponse { access_token })
    }

    /// Creates an account and sends the welcome email.
    ///
    /// The email is sent after the user is persisted; a delivery failure
    /// surfaces as an error but does not undo the registration.
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<RegisterResponse> {
        request
            .validate()
            .map_err(|e| ServiceError::Validation(e.to_string()))?;

        if request.password != request.password_confirm {
            return Err(ServiceError::PasswordMismatch);
        }

        let email = normalize_email(&request.email);
        if self.store.find_by_email(&email).await?.is_some() {
            return Err(ServiceError::UserAlreadyExists);
        }

        let password_hash = self.hasher.hash(&request.password)?;
        let name = format!(
            "{} {}",
            request.first_name.trim(),
            request.last_name.trim()
        );
        let profile_picture_url = initials_avatar_url(&request.first_name, &request.last_name);

        let user = self
            .store
            .create(NewUser {
                name,
                email,
                password_hash,
                profile_picture_url: Some(profile_picture_url),
                role: UserRole::default(),
            })
            .await
            .map_err(|e| match e {
                StoreError::DuplicateEmail => ServiceError::UserAlreadyExists,
                other => ServiceError::Store(other),
            })?;

        info!("registered user {}", user.id);

        if let Err(e) = self
            .notifier
            .send_created_account_email(&user.name, &user.email)
            .await
        {
            warn!("account-created email failed for user {}: {e}", user.id);
            return Err(ServiceError::Email(e.to_string()));
        }

        Ok(RegisterResponse {
            message: "Account successfully created.".to_string(),
            user: RegisteredUser { email: user.email },
        })
    }

    /// Starts a password-reset flow; always answers with the generic message.
    pub async fn request_password_reset(&self, email: &str) -> ServiceResult<MessageResponse> {
        self.reset.request(email).await
    }

    /// Checks a reset token without consuming it.
    pub async fn verify_reset_token(&self, token: &str) -> ServiceResult<MessageResponse> {
        self.reset.verify_token(token).await
    }

    /// Redeems a reset token for a new password.
    pub async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
    ) -> ServiceResult<MessageResponse> {
        self.reset.redeem(token, new_password).await
    }

    /// Enrolls the user in two-factor authentication.
    pub async fn enable_two_factor(&self, user_id: Uuid) -> ServiceResult<TwoFactorSetupResponse> {
        self.two_factor.enable(user_id).await
    }

    /// Verifies a submitted two-factor code.
    pub async fn verify_two_factor(
        &self,
        user_id: Uuid,
        code: &str,
    ) -> ServiceResult<MessageResponse> {
        self.two_factor.verify(user_id, code).await
    }

    /// Turns two-factor authentication off for the user.
    pub async fn disable_two_factor(&self, user_id: Uuid) -> ServiceResult<MessageResponse> {
        self.two_factor.disable(user_id).await
    }
}
