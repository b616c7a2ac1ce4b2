//! Record Store Abstraction
//!
//! The credential store is an external collaborator: services only see the
//! [`UserStore`] trait, injected at construction. A PostgreSQL implementation
//! backs production; an in-memory implementation backs tests and demos.
//!
//! Lookups signal "not found" with `Ok(None)`, never with an error. Field
//! updates take ids the caller has just read from the same store; an absent
//! id is a no-op. The one exception is [`UserStore::complete_password_reset`],
//! which reports through its return value whether the conditional write won.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::database::Pagination;
use crate::models::{NewUser, UserRecord};

pub use memory::InMemoryUserStore;
pub use postgres::PgUserStore;

/// Store transport and integrity failures
#[derive(Error, Debug)]
pub enum StoreError {
    /// Underlying database failure
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Insert violated the email uniqueness constraint
    #[error("email already registered")]
    DuplicateEmail,

    /// A persisted row could not be mapped back into a record
    #[error("corrupted record: {0}")]
    Corrupted(String),
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence contract for user records
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<UserRecord>>;

    async fn find_by_reset_token(&self, token: &str) -> StoreResult<Option<UserRecord>>;

    /// Persists a new user. Fails with [`StoreError::DuplicateEmail`] when the
    /// email is already registered.
    async fn create(&self, user: NewUser) -> StoreResult<UserRecord>;

    /// Stamps the last successful login time.
    async fn touch_last_login(&self, id: Uuid) -> StoreResult<()>;

    /// Persists a reset token, raises the pending-reset flag, and stamps the
    /// issuance time.
    async fn begin_password_reset(&self, id: Uuid, token: &str) -> StoreResult<()>;

    /// Conditionally replaces the password hash and clears the pending-reset
    /// flag in a single write. Returns `false` when no reset was pending at
    /// write time, so exactly one of two racing redeems can win.
    async fn complete_password_reset(&self, id: Uuid, password_hash: &str) -> StoreResult<bool>;

    /// Persists a two-factor secret and marks two-factor as enabled.
    async fn save_two_factor_secret(&self, id: Uuid, secret: &str) -> StoreResult<()>;

    /// Clears the two-factor secret, flag, and backup codes.
    async fn clear_two_factor(&self, id: Uuid) -> StoreResult<()>;

    /// Pages through all users, oldest first.
    async fn list(&self, pagination: Pagination) -> StoreResult<Vec<UserRecord>>;

    /// Pages through users whose name contains `name`, case-insensitively.
    async fn search_by_name(&self, name: &str, pagination: Pagination)
        -> StoreResult<Vec<UserRecord>>;
}
