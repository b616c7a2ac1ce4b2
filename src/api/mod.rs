//! HTTP API layer with handlers and configurable routing

pub mod handlers;
pub mod middleware;
pub mod routes;

use std::sync::Arc;

use crate::service::{AuthService, JwtService, UserService};

pub use middleware::AuthUser;
pub use routes::{create_routes, RouterBuilder};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub user_service: Arc<UserService>,
    pub jwt_service: Arc<JwtService>,
}
