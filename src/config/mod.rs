//! Configuration Module
//!
//! Centralized, environment-driven configuration for the account service.

use anyhow::Context;

use crate::service::email_service::EmailConfig;

/// Environment variable helpers
pub mod env {
    use std::env;

    /// Get environment variable as string with default
    pub fn get_string(key: &str, default: &str) -> String {
        env::var(key).unwrap_or_else(|_| default.to_string())
    }

    /// Get environment variable as u16 with default
    pub fn get_u16(key: &str, default: u16) -> u16 {
        env::var(key)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Get environment variable as u32 with default
    pub fn get_u32(key: &str, default: u32) -> u32 {
        env::var(key)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Get environment variable as i64 with default
    pub fn get_i64(key: &str, default: i64) -> i64 {
        env::var(key)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Check if environment variable is set
    pub fn is_set(key: &str) -> bool {
        env::var(key).is_ok()
    }
}

/// Application configuration combining all service settings
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub auth: AuthConfig,
    /// Present only when SMTP is configured; otherwise emails are logged.
    pub email: Option<EmailConfig>,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expires_hours: i64,
}

/// Authentication and credential-lifecycle settings
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Application name, used as the TOTP issuer label
    pub app_name: String,
    /// bcrypt cost factor for new password hashes
    pub bcrypt_cost: u32,
    /// Validity window of password-reset tokens
    pub reset_token_ttl_minutes: i64,
}

impl AppConfig {
    /// Load configuration from the environment.
    ///
    /// `DATABASE_URL` is consumed separately by
    /// [`crate::database::DatabaseConfig`]; `JWT_SECRET` is the only other
    /// required variable.
    pub fn from_env() -> anyhow::Result<Self> {
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")
                .context("JWT_SECRET environment variable is required")?,
            expires_hours: env::get_i64("JWT_EXPIRES_HOURS", 24),
        };

        let server = ServerConfig {
            host: env::get_string("SERVER_HOST", "0.0.0.0"),
            port: env::get_u16("SERVER_PORT", 3000),
        };

        let auth = AuthConfig {
            app_name: env::get_string("APP_NAME", "Account Service"),
            bcrypt_cost: env::get_u32(
                "BCRYPT_COST",
                crate::service::password::DEFAULT_PASSWORD_COST,
            ),
            reset_token_ttl_minutes: env::get_i64(
                "RESET_TOKEN_TTL_MINUTES",
                crate::service::reset::DEFAULT_RESET_TOKEN_TTL_MINUTES,
            ),
        };

        let email = if env::is_set("SMTP_HOST") {
            Some(EmailConfig::from_env()?)
        } else {
            None
        };

        Ok(Self {
            server,
            jwt,
            auth,
            email,
        })
    }
}
