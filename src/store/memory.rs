//! In-memory implementation of [`UserStore`]
//!
//! Backs the test suite and local demos. Behavior mirrors the PostgreSQL
//! implementation, including the conditional password-reset write.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::Pagination;
use crate::models::{NewUser, UserRecord, UserStatus};
use crate::store::{StoreError, StoreResult, UserStore};

/// Lock-guarded map of user records
#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<Uuid, UserRecord>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn page(mut records: Vec<UserRecord>, pagination: Pagination) -> Vec<UserRecord> {
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        records
            .into_iter()
            .skip(pagination.offset as usize)
            .take(pagination.limit as usize)
            .collect()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<UserRecord>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn find_by_reset_token(&self, token: &str) -> StoreResult<Option<UserRecord>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.reset_password_token.as_deref() == Some(token))
            .cloned())
    }

    async fn create(&self, user: NewUser) -> StoreResult<UserRecord> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.email == user.email) {
            return Err(StoreError::DuplicateEmail);
        }

        let record = UserRecord {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            status: UserStatus::Active,
            profile_picture_url: user.profile_picture_url,
            created_at: Utc::now(),
            last_login: None,
            is_resetting_password: false,
            reset_password_token: None,
            date_reset_password: None,
            two_factor_secret: None,
            is_2fa_enabled: false,
            two_factor_backup_codes: vec![],
        };

        users.insert(record.id, record.clone());
        Ok(record)
    }

    async fn touch_last_login(&self, id: Uuid) -> StoreResult<()> {
        let mut users = self.users.write().await;
        if let Some(user) = users.get_mut(&id) {
            user.last_login = Some(Utc::now());
        }
        Ok(())
    }

    async fn begin_password_reset(&self, id: Uuid, token: &str) -> StoreResult<()> {
        let mut users = self.users.write().await;
        if let Some(user) = users.get_mut(&id) {
            user.is_resetting_password = true;
            user.reset_password_token = Some(token.to_string());
            user.date_reset_password = Some(Utc::now());
        }
        Ok(())
    }

    async fn complete_password_reset(&self, id: Uuid, password_hash: &str) -> StoreResult<bool> {
        let mut users = self.users.write().await;
        let Some(user) = users.get_mut(&id) else {
            return Ok(false);
        };

        // Check-and-clear under the write lock, same guarantee as the SQL
        // conditional update.
        if !user.is_resetting_password {
            return Ok(false);
        }

        user.password_hash = password_hash.to_string();
        user.is_resetting_password = false;
        user.date_reset_password = Some(Utc::now());
        Ok(true)
    }

    async fn save_two_factor_secret(&self, id: Uuid, secret: &str) -> StoreResult<()> {
        let mut users = self.users.write().await;
        if let Some(user) = users.get_mut(&id) {
            user.two_factor_secret = Some(secret.to_string());
            user.is_2fa_enabled = true;
        }
        Ok(())
    }

    async fn clear_two_factor(&self, id: Uuid) -> StoreResult<()> {
        let mut users = self.users.write().await;
        if let Some(user) = users.get_mut(&id) {
            user.two_factor_secret = None;
            user.is_2fa_enabled = false;
            user.two_factor_backup_codes.clear();
        }
        Ok(())
    }

    async fn list(&self, pagination: Pagination) -> StoreResult<Vec<UserRecord>> {
        let users = self.users.read().await;
        Ok(Self::page(users.values().cloned().collect(), pagination))
    }

    async fn search_by_name(
        &self,
        name: &str,
        pagination: Pagination,
    ) -> StoreResult<Vec<UserRecord>> {
        let needle = name.to_lowercase();
        let users = self.users.read().await;
        let matches = users
            .values()
            .filter(|u| u.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();

        Ok(Self::page(matches, pagination))
    }
}
