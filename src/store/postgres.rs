//! PostgreSQL implementation of [`UserStore`]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::Pagination;
use crate::models::{NewUser, UserRecord, UserRole, UserStatus};
use crate::store::{StoreError, StoreResult, UserStore};

const USER_COLUMNS: &str = "id, name, email, password_hash, role, status, profile_picture_url, \
     created_at, last_login, is_resetting_password, reset_password_token, date_reset_password, \
     two_factor_secret, is_2fa_enabled, two_factor_backup_codes";

/// Database row shape of the users table
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    status: String,
    profile_picture_url: Option<String>,
    created_at: DateTime<Utc>,
    last_login: Option<DateTime<Utc>>,
    is_resetting_password: bool,
    reset_password_token: Option<String>,
    date_reset_password: Option<DateTime<Utc>>,
    two_factor_secret: Option<String>,
    is_2fa_enabled: bool,
    two_factor_backup_codes: Vec<String>,
}

impl TryFrom<UserRow> for UserRecord {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = UserRole::parse(&row.role)
            .ok_or_else(|| StoreError::Corrupted(format!("unknown role: {}", row.role)))?;
        let status = UserStatus::parse(&row.status)
            .ok_or_else(|| StoreError::Corrupted(format!("unknown status: {}", row.status)))?;

        Ok(UserRecord {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            role,
            status,
            profile_picture_url: row.profile_picture_url,
            created_at: row.created_at,
            last_login: row.last_login,
            is_resetting_password: row.is_resetting_password,
            reset_password_token: row.reset_password_token,
            date_reset_password: row.date_reset_password,
            two_factor_secret: row.two_factor_secret,
            is_2fa_enabled: row.is_2fa_enabled,
            two_factor_backup_codes: row.two_factor_backup_codes,
        })
    }
}

/// SQLx-backed user store over a shared connection pool
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_one_by(&self, column: &str, value: &str) -> StoreResult<Option<UserRecord>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {column} = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;

        row.map(UserRecord::try_from).transpose()
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>> {
        self.fetch_one_by("email", email).await
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<UserRecord>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(UserRecord::try_from).transpose()
    }

    async fn find_by_reset_token(&self, token: &str) -> StoreResult<Option<UserRecord>> {
        self.fetch_one_by("reset_password_token", token).await
    }

    async fn create(&self, user: NewUser) -> StoreResult<UserRecord> {
        let sql = format!(
            "INSERT INTO users (name, email, password_hash, profile_picture_url, role) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {USER_COLUMNS}"
        );

        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.profile_picture_url)
            .bind(user.role.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db_err) if db_err.constraint() == Some("users_email_key") => {
                    StoreError::DuplicateEmail
                }
                _ => StoreError::Database(e),
            })?;

        row.try_into()
    }

    async fn touch_last_login(&self, id: Uuid) -> StoreResult<()> {
        sqlx::query("UPDATE users SET last_login = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn begin_password_reset(&self, id: Uuid, token: &str) -> StoreResult<()> {
        sqlx::query(
            "UPDATE users \
             SET is_resetting_password = TRUE, reset_password_token = $2, \
                 date_reset_password = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(token)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn complete_password_reset(&self, id: Uuid, password_hash: &str) -> StoreResult<bool> {
        // Conditional write: only one of two racing redeems can observe the
        // flag still raised.
        let result = sqlx::query(
            "UPDATE users \
             SET password_hash = $2, is_resetting_password = FALSE, \
                 date_reset_password = NOW() \
             WHERE id = $1 AND is_resetting_password = TRUE",
        )
        .bind(id)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn save_two_factor_secret(&self, id: Uuid, secret: &str) -> StoreResult<()> {
        sqlx::query(
            "UPDATE users SET two_factor_secret = $2, is_2fa_enabled = TRUE WHERE id = $1",
        )
        .bind(id)
        .bind(secret)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn clear_two_factor(&self, id: Uuid) -> StoreResult<()> {
        sqlx::query(
            "UPDATE users \
             SET two_factor_secret = NULL, is_2fa_enabled = FALSE, \
                 two_factor_backup_codes = '{}' \
             WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list(&self, pagination: Pagination) -> StoreResult<Vec<UserRecord>> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at, id LIMIT $1 OFFSET $2"
        );
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .bind(pagination.limit)
            .bind(pagination.offset)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(UserRecord::try_from).collect()
    }

    async fn search_by_name(
        &self,
        name: &str,
        pagination: Pagination,
    ) -> StoreResult<Vec<UserRecord>> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users \
             WHERE name ILIKE '%' || $1 || '%' \
             ORDER BY created_at, id LIMIT $2 OFFSET $3"
        );
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .bind(name)
            .bind(pagination.limit)
            .bind(pagination.offset)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(UserRecord::try_from).collect()
    }
}
