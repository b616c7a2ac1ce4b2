//! Account Service Library
//!
//! A backend authentication and user-management service: account
//! registration, credential login, password reset via emailed token,
//! optional TOTP two-factor authentication, and role-gated user listing.
//!
//! # Features
//!
//! - **Credential lifecycle**: bcrypt password hashing, single-use reset
//!   tokens with a bounded validity window, TOTP enrollment and verification
//! - **Injected collaborators**: the record store and the email notifier are
//!   trait-bound dependencies, so tests run against in-process doubles
//! - **HTTP API**: axum endpoints with JWT session tokens and an admin guard
//! - **Database Integration**: PostgreSQL with connection pooling
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use account_service::{
//!     api::{AppState, RouterBuilder},
//!     service::{
//!         AuthService, JwtService, LoggingNotifier, PasswordHasher,
//!         PasswordResetService, TwoFactorService, UserService,
//!     },
//!     store::{InMemoryUserStore, UserStore},
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store: Arc<dyn UserStore> = Arc::new(InMemoryUserStore::new());
//!     let notifier = Arc::new(LoggingNotifier);
//!     let hasher = PasswordHasher::default();
//!     let jwt_service = Arc::new(JwtService::new("dev-secret".to_string()));
//!
//!     let reset = PasswordResetService::new(
//!         store.clone(),
//!         hasher.clone(),
//!         notifier.clone(),
//!         chrono::Duration::minutes(30),
//!     );
//!     let two_factor = TwoFactorService::new(store.clone(), "My App".to_string());
//!     let auth_service = Arc::new(AuthService::new(
//!         store.clone(),
//!         hasher,
//!         jwt_service.clone(),
//!         notifier,
//!         reset,
//!         two_factor,
//!     ));
//!     let user_service = Arc::new(UserService::new(store));
//!
//!     let app = RouterBuilder::with_all_routes().build(AppState {
//!         auth_service,
//!         user_service,
//!         jwt_service,
//!     });
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//!     axum::serve(listener, app).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - **API Layer**: HTTP handlers, auth middleware, configurable routes
//! - **Service Layer**: the auth orchestrator and its credential-lifecycle
//!   components (hasher, reset issuer, two-factor manager)
//! - **Store**: the record-store trait with PostgreSQL and in-memory
//!   implementations
//! - **Models**: data structures and request/response payloads
//! - **Utils**: error taxonomy and validation helpers

/// HTTP API layer with handlers and configurable routing
pub mod api;

/// Configuration management for all service settings
pub mod config;

/// Database connection management and configuration
pub mod database;

/// Data models and request/response structures
pub mod models;

/// Business logic and credential-lifecycle services
pub mod service;

/// Record store abstraction and implementations
pub mod store;

/// Shared utilities for error handling and validation
pub mod utils;

// Re-export commonly used types for convenient access
pub use api::{create_routes, AppState, RouterBuilder};
pub use models::{
    requests::{
        LoginRequest, LoginResponse, MessageResponse, PaginationQuery, RegisterRequest,
        RegisterResponse, ResetPasswordRequest, TwoFactorSetupResponse, TwoFactorVerifyRequest,
    },
    ListedUser, User, UserContext, UserRecord, UserRole, UserSearchResult, UserStatus,
};
pub use service::{
    AuthService, EmailService, JwtService, LoggingNotifier, Notifier, PasswordHasher,
    PasswordResetService, ServiceError, TwoFactorService, UserService,
};
pub use store::{InMemoryUserStore, PgUserStore, StoreError, UserStore};
pub use utils::error::{AppError, AppResult, ErrorResponse};

// Re-export database utilities for configuration
pub use database::{DatabaseConfig, DatabasePool};

// Re-export configuration system
pub use config::{AppConfig, AuthConfig, JwtConfig, ServerConfig};

/// Library version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
