//! Password Reset Service
//!
//! Stateful reset-token issuance and redemption. Per user the store holds a
//! single `is_resetting_password` flag, the token string, and the issuance
//! timestamp; the flag alone gates redemption, the timestamp bounds validity.

use std::sync::Arc;

use chrono::{Duration, Utc};
use log::debug;
use rand::RngCore;

use crate::models::requests::MessageResponse;
use crate::models::UserRecord;
use crate::service::{Notifier, PasswordHasher, ServiceError, ServiceResult};
use crate::store::UserStore;
use crate::utils::validation::normalize_email;

/// Default validity window for issued reset tokens
pub const DEFAULT_RESET_TOKEN_TTL_MINUTES: i64 = 30;

/// Bytes of entropy per token; hex-encoded to twice as many characters
const RESET_TOKEN_BYTES: usize = 32;

const GENERIC_RESET_MESSAGE: &str =
    "If the email exists in our system, you will receive password reset instructions.";

/// Issues, verifies, and redeems password-reset tokens
pub struct PasswordResetService {
    store: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    notifier: Arc<dyn Notifier>,
    token_ttl: Duration,
}

impl PasswordResetService {
    pub fn new(
        store: Arc<dyn UserStore>,
        hasher: PasswordHasher,
        notifier: Arc<dyn Notifier>,
        token_ttl: Duration,
    ) -> Self {
        Self {
            store,
            hasher,
            notifier,
            token_ttl,
        }
    }

    /// Starts a reset flow for the given email.
    ///
    /// The response is identical whether or not the email is registered, so
    /// the endpoint cannot be used to enumerate accounts. Unknown emails take
    /// a no-op path.
    pub async fn request(&self, email: &str) -> ServiceResult<MessageResponse> {
        let Some(user) = self.store.find_by_email(&normalize_email(email)).await? else {
            debug!("password reset requested for unregistered email");
            return Ok(MessageResponse::new(GENERIC_RESET_MESSAGE));
        };

        let token = generate_reset_token();
        self.store.begin_password_reset(user.id, &token).await?;

        self.notifier
            .send_requested_password_email(&user.name, &user.email, &token)
            .await
            .map_err(|e| ServiceError::Email(e.to_string()))?;

        Ok(MessageResponse::new(GENERIC_RESET_MESSAGE))
    }

    /// Checks that a token identifies a user with a live, unexpired reset.
    pub async fn verify_token(&self, token: &str) -> ServiceResult<MessageResponse> {
        let user = self.lookup(token).await?;
        self.ensure_pending(&user)?;

        Ok(MessageResponse::new("The reset token is valid."))
    }

    /// Redeems a token for a new password.
    ///
    /// The final write is conditional on the flag still being raised, so of
    /// two concurrent redeems exactly one succeeds. The token string is left
    /// on the record; the cleared flag alone blocks a second redemption.
    pub async fn redeem(&self, token: &str, new_password: &str) -> ServiceResult<MessageResponse> {
        let user = self.lookup(token).await?;
        self.ensure_pending(&user)?;

        let password_hash = self.hasher.hash(new_password)?;
        let won = self
            .store
            .complete_password_reset(user.id, &password_hash)
            .await?;
        if !won {
            return Err(ServiceError::ResetNotInProgress);
        }

        Ok(MessageResponse::new(
            "Your password has been successfully changed.",
        ))
    }

    async fn lookup(&self, token: &str) -> ServiceResult<UserRecord> {
        self.store
            .find_by_reset_token(token)
            .await?
            .ok_or(ServiceError::ResetTokenNotFound)
    }

    fn ensure_pending(&self, user: &UserRecord) -> ServiceResult<()> {
        if !user.is_resetting_password {
            return Err(ServiceError::ResetNotInProgress);
        }

        if let Some(issued_at) = user.date_reset_password {
            if Utc::now() - issued_at > self.token_ttl {
                return Err(ServiceError::ResetTokenExpired);
            }
        }

        Ok(())
    }
}

/// Generates a 256-bit random token, hex-encoded
fn generate_reset_token() -> String {
    let mut bytes = [0u8; RESET_TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);

    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
