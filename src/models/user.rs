//! User Model
//!
//! Core user data structures shared by the record store and the services.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role assigned to a user account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(UserRole::User),
            "admin" => Some(UserRole::Admin),
            _ => None,
        }
    }
}

impl Default for UserRole {
    fn default() -> Self {
        UserRole::User
    }
}

/// Lifecycle status of a user account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Suspended,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Suspended => "suspended",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(UserStatus::Active),
            "suspended" => Some(UserStatus::Suspended),
            _ => None,
        }
    }
}

impl Default for UserStatus {
    fn default() -> Self {
        UserStatus::Active
    }
}

/// Full user record as held by the store
///
/// Carries the password hash and the two-factor secret, so it stays internal
/// to the store and service layers and is never serialized into an API
/// response. Public output goes through [`User`].
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub profile_picture_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
    pub is_resetting_password: bool,
    pub reset_password_token: Option<String>,
    pub date_reset_password: Option<DateTime<Utc>>,
    pub two_factor_secret: Option<String>,
    pub is_2fa_enabled: bool,
    pub two_factor_backup_codes: Vec<String>,
}

/// Fields required to create a new user record
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub profile_picture_url: Option<String>,
    pub role: UserRole,
}

/// Public user profile, stripped of credentials and the two-factor secret
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub profile_picture_url: Option<String>,
    pub role: UserRole,
    pub status: UserStatus,
    pub is_2fa_enabled: bool,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        User {
            id: record.id,
            name: record.name,
            email: record.email,
            profile_picture_url: record.profile_picture_url,
            role: record.role,
            status: record.status,
            is_2fa_enabled: record.is_2fa_enabled,
            created_at: record.created_at,
            last_login: record.last_login,
        }
    }
}

/// Row shape of the role-gated user listing
#[derive(Debug, Clone, Serialize)]
pub struct ListedUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl From<UserRecord> for ListedUser {
    fn from(record: UserRecord) -> Self {
        ListedUser {
            id: record.id,
            name: record.name,
            email: record.email,
            role: record.role,
            created_at: record.created_at,
        }
    }
}

/// Row shape of the name-search results
#[derive(Debug, Clone, Serialize)]
pub struct UserSearchResult {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<UserRecord> for UserSearchResult {
    fn from(record: UserRecord) -> Self {
        UserSearchResult {
            id: record.id,
            name: record.name,
            email: record.email,
        }
    }
}
