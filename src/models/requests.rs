//! Request and Response Models
//!
//! Data structures for API request and response payloads with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request payload for account registration
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email address (must be unique and valid format)
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,

    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100, message = "Last name is required"))]
    pub last_name: String,

    #[validate(length(min = 1, max = 128, message = "Password is required"))]
    pub password: String,

    /// Must match `password` exactly
    #[validate(length(min = 1, message = "Password confirmation is required"))]
    pub password_confirm: String,
}

/// Request payload for credential login
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Request payload asking for a password-reset email
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RequestPasswordResetRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
}

/// Query parameters for reset-token verification
#[derive(Debug, Clone, Deserialize)]
pub struct ResetTokenQuery {
    pub token: String,
}

/// Request payload redeeming a reset token for a new password
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1, max = 128, message = "Password is required"))]
    pub password: String,

    #[validate(length(min = 1, message = "Reset token is required"))]
    pub token: String,
}

/// Request payload for two-factor code verification
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TwoFactorVerifyRequest {
    /// 6-digit TOTP code
    #[validate(length(min = 6, max = 6, message = "Code must be exactly 6 digits"))]
    pub code: String,
}

/// Pagination query parameters shared by the listing endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PaginationQuery {
    /// Page number, 1-based
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    /// Page size, clamped to 1..=100
    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(10).clamp(1, 100)
    }
}

/// Query parameters for the name-search endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct SearchUsersQuery {
    pub name: String,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl SearchUsersQuery {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery {
            page: self.page,
            limit: self.limit,
        }
    }
}

/// Response for successful login
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
}

/// Email of the freshly created account, echoed back on registration
#[derive(Debug, Serialize)]
pub struct RegisteredUser {
    pub email: String,
}

/// Response for successful registration
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: RegisteredUser,
}

/// Generic message response used by the reset and two-factor flows
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Response for two-factor enrollment
#[derive(Debug, Serialize)]
pub struct TwoFactorSetupResponse {
    /// PNG data URL rendering the otpauth URI, ready for an <img> tag
    pub qr_code_url: String,
    /// Raw base32 secret, returned as a manual-entry recovery aid.
    /// Confidential: callers must protect it in transit.
    pub secret: String,
}

/// Response for health check
#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub version: String,
}
