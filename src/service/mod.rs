//! Business logic services
//!
//! Each service is constructed with its collaborators injected (record store,
//! notifier, hasher), so tests can substitute doubles without any global
//! state.

pub mod auth;
pub mod email_service;
pub mod jwt;
pub mod password;
pub mod reset;
pub mod totp;
pub mod user;

use thiserror::Error;

use crate::store::StoreError;
use crate::utils::error::AppError;

pub use auth::AuthService;
pub use email_service::{EmailConfig, EmailService, LoggingNotifier, Notifier};
pub use jwt::JwtService;
pub use password::PasswordHasher;
pub use reset::PasswordResetService;
pub use totp::TwoFactorService;
pub use user::UserService;

/// Failure classes shared by the account services
///
/// Display strings double as the user-facing messages, so variants carry the
/// exact wording the API contract promises.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("User does not exist.")]
    UserNotFound,

    #[error("The reset token is incorrect.")]
    ResetTokenNotFound,

    #[error("2FA secret not found")]
    TwoFactorNotEnrolled,

    #[error("Invalid password.")]
    InvalidPassword,

    #[error("Invalid 2FA token")]
    InvalidTwoFactorCode,

    #[error("Passwords do not match.")]
    PasswordMismatch,

    #[error("User already exists.")]
    UserAlreadyExists,

    #[error("No password reset request is in progress.")]
    ResetNotInProgress,

    #[error("The reset token has expired.")]
    ResetTokenExpired,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Password hashing error: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    #[error("Email delivery error: {0}")]
    Email(String),

    #[error("Two-factor provisioning error: {0}")]
    TwoFactor(String),

    #[error("Token generation error: {0}")]
    Token(String),
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        let message = err.to_string();
        match err {
            ServiceError::UserNotFound
            | ServiceError::ResetTokenNotFound
            | ServiceError::TwoFactorNotEnrolled => AppError::NotFound(message),

            ServiceError::InvalidPassword | ServiceError::InvalidTwoFactorCode => {
                AppError::Unauthorized(message)
            }

            ServiceError::PasswordMismatch
            | ServiceError::UserAlreadyExists
            | ServiceError::ResetNotInProgress
            | ServiceError::ResetTokenExpired => AppError::BadRequest(message),

            ServiceError::Validation(msg) => AppError::Validation(msg),
            ServiceError::Store(e) => AppError::Store(e),
            ServiceError::Email(msg) => AppError::Email(msg),

            ServiceError::Hashing(_) | ServiceError::TwoFactor(_) | ServiceError::Token(_) => {
                AppError::Internal(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_match_contract() {
        assert_eq!(ServiceError::UserNotFound.to_string(), "User does not exist.");
        assert_eq!(ServiceError::InvalidPassword.to_string(), "Invalid password.");
        assert_eq!(
            ServiceError::UserAlreadyExists.to_string(),
            "User already exists."
        );
        assert_eq!(
            ServiceError::ResetNotInProgress.to_string(),
            "No password reset request is in progress."
        );
    }

    #[test]
    fn test_taxonomy_mapping() {
        assert!(matches!(
            AppError::from(ServiceError::UserNotFound),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            AppError::from(ServiceError::InvalidTwoFactorCode),
            AppError::Unauthorized(_)
        ));
        assert!(matches!(
            AppError::from(ServiceError::PasswordMismatch),
            AppError::BadRequest(_)
        ));
    }
}
