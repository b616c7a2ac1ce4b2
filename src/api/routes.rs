//! API Route Definitions
//!
//! Route construction through a builder that lets deployments enable only
//! the endpoint groups they need (e.g. a registration-only service, or an
//! instance without the user directory).

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::api::handlers::*;
use crate::api::middleware::{admin_middleware, auth_middleware};
use crate::api::AppState;

/// Builder for creating API routes with configurable endpoint groups
#[derive(Default)]
pub struct RouterBuilder {
    /// GET /health
    health_check: bool,
    /// POST /auth/register and POST /auth/login
    auth: bool,
    /// The /auth/reset-password group
    password_reset: bool,
    /// The /auth/2fa group (requires authentication)
    two_factor: bool,
    /// The /users group (listing is admin-gated)
    user_directory: bool,
}

impl RouterBuilder {
    /// All routes disabled; enable groups explicitly.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything enabled — the full account service.
    pub fn with_all_routes() -> Self {
        Self {
            health_check: true,
            auth: true,
            password_reset: true,
            two_factor: true,
            user_directory: true,
        }
    }

    /// Authentication only: register, login, reset, and 2FA, without the
    /// user directory.
    pub fn with_auth_routes() -> Self {
        Self {
            health_check: true,
            auth: true,
            password_reset: true,
            two_factor: true,
            user_directory: false,
        }
    }

    /// Health check only, for monitoring shells.
    pub fn with_minimal_routes() -> Self {
        Self {
            health_check: true,
            ..Self::default()
        }
    }

    pub fn health_check(mut self, enabled: bool) -> Self {
        self.health_check = enabled;
        self
    }

    pub fn auth(mut self, enabled: bool) -> Self {
        self.auth = enabled;
        self
    }

    pub fn password_reset(mut self, enabled: bool) -> Self {
        self.password_reset = enabled;
        self
    }

    pub fn two_factor(mut self, enabled: bool) -> Self {
        self.two_factor = enabled;
        self
    }

    pub fn user_directory(mut self, enabled: bool) -> Self {
        self.user_directory = enabled;
        self
    }

    /// Builds the router with the selected groups wired to `state`.
    pub fn build(self, state: AppState) -> Router {
        let mut router = Router::new();

        if self.health_check {
            router = router.route("/health", get(health_check));
        }

        if self.auth {
            router = router
                .route("/auth/register", post(register))
                .route("/auth/login", post(login));
        }

        if self.password_reset {
            router = router
                .route("/auth/reset-password", post(request_password_reset))
                .route("/auth/reset-password/verify", get(verify_reset_token))
                .route("/auth/reset-password/reset", post(reset_password));
        }

        if self.two_factor {
            let two_factor_routes = Router::new()
                .route("/auth/2fa/enable", post(enable_two_factor))
                .route("/auth/2fa/verify", post(verify_two_factor))
                .route("/auth/2fa/disable", post(disable_two_factor))
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    auth_middleware,
                ));
            router = router.merge(two_factor_routes);
        }

        if self.user_directory {
            // Listing requires the admin role on top of authentication.
            let admin_routes = Router::new()
                .route("/users", get(list_users))
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    admin_middleware,
                ))
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    auth_middleware,
                ));

            let user_routes = Router::new()
                .route("/users/me", get(me))
                .route("/users/search-users", get(search_users))
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    auth_middleware,
                ));

            router = router.merge(admin_routes).merge(user_routes);
        }

        router.with_state(state)
    }
}

/// Convenience constructor for the fully-featured router
pub fn create_routes(state: AppState) -> Router {
    RouterBuilder::with_all_routes().build(state)
}
