//! Account Service Development Server
//!
//! Runs the full HTTP service against PostgreSQL with every endpoint group
//! enabled. Production deployments compose their own router through
//! `RouterBuilder` in their own binary.

use std::sync::Arc;

use dotenv::dotenv;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use account_service::{
    api::{AppState, RouterBuilder},
    config::AppConfig,
    database::DatabaseConfig,
    service::{
        AuthService, EmailService, JwtService, LoggingNotifier, Notifier, PasswordHasher,
        PasswordResetService, TwoFactorService, UserService,
    },
    store::{PgUserStore, UserStore},
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file if present
    dotenv().ok();

    env_logger::init();

    log::info!("Starting Account Service v{}", account_service::VERSION);

    let config = AppConfig::from_env()?;
    let db_config = DatabaseConfig::from_env()?;
    let pool = db_config.create_pool().await?;

    log::info!("Running database migrations");
    sqlx::migrate!("./migrations").run(&pool).await?;

    let store: Arc<dyn UserStore> = Arc::new(PgUserStore::new(pool));

    let notifier: Arc<dyn Notifier> = match &config.email {
        Some(email_config) => {
            log::info!("SMTP notifier configured for {}", email_config.smtp_host);
            Arc::new(EmailService::new(email_config.clone())?)
        }
        None => {
            log::warn!("SMTP not configured; emails will only be logged");
            Arc::new(LoggingNotifier)
        }
    };

    let hasher = PasswordHasher::new(config.auth.bcrypt_cost);
    let jwt_service = Arc::new(JwtService::with_expiration(
        config.jwt.secret.clone(),
        chrono::Duration::hours(config.jwt.expires_hours),
    ));

    let reset = PasswordResetService::new(
        store.clone(),
        hasher.clone(),
        notifier.clone(),
        chrono::Duration::minutes(config.auth.reset_token_ttl_minutes),
    );
    let two_factor = TwoFactorService::new(store.clone(), config.auth.app_name.clone());

    let auth_service = Arc::new(AuthService::new(
        store.clone(),
        hasher,
        jwt_service.clone(),
        notifier,
        reset,
        two_factor,
    ));
    let user_service = Arc::new(UserService::new(store));

    let app_state = AppState {
        auth_service,
        user_service,
        jwt_service,
    };

    let app = RouterBuilder::with_all_routes().build(app_state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(
                // Permissive CORS for development
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            )
            .into_inner(),
    );

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    log::info!("Listening on {bind_addr}");

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
