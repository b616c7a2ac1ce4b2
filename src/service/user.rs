//! User Directory Service
//!
//! Paginated listing, case-insensitive name search, and profile lookup.

use std::sync::Arc;

use uuid::Uuid;

use crate::database::Pagination;
use crate::models::{ListedUser, User, UserRecord, UserSearchResult};
use crate::service::{ServiceError, ServiceResult};
use crate::store::UserStore;

/// Read-mostly user directory operations
pub struct UserService {
    store: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// Pages through all users, oldest first. Role-gated at the API layer.
    pub async fn list_users(&self, page: u32, limit: u32) -> ServiceResult<Vec<ListedUser>> {
        let records = self.store.list(Pagination::new(page, limit)).await?;
        Ok(records.into_iter().map(ListedUser::from).collect())
    }

    /// Pages through users whose name contains `name`, case-insensitively.
    pub async fn search_users(
        &self,
        name: &str,
        page: u32,
        limit: u32,
    ) -> ServiceResult<Vec<UserSearchResult>> {
        let records = self
            .store
            .search_by_name(name, Pagination::new(page, limit))
            .await?;
        Ok(records.into_iter().map(UserSearchResult::from).collect())
    }

    /// The caller's own profile, without secrets.
    pub async fn get_profile(&self, user_id: Uuid) -> ServiceResult<User> {
        let record = self.get_record(user_id).await?;
        Ok(record.into())
    }

    /// Full record lookup for in-crate callers (role checks).
    pub(crate) async fn get_record(&self, user_id: Uuid) -> ServiceResult<UserRecord> {
        self.store
            .find_by_id(user_id)
            .await?
            .ok_or(ServiceError::UserNotFound)
    }
}
