//! Authentication Middleware
//!
//! JWT validation and the admin-role guard for protected endpoints.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use crate::models::{UserContext, UserRole};
use crate::utils::error::AppError;

/// Extension type carrying the authenticated user context
#[derive(Debug, Clone)]
pub struct AuthUser(pub UserContext);

/// Validates the Bearer token and stores the user context in the request
/// extensions. Returns 401 on any failure.
pub async fn auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".into()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Invalid Authorization header format".into()))?;

    let user_context = state
        .jwt_service
        .validate(token)
        .map_err(|_| AppError::Unauthorized("Invalid or expired token".into()))?;

    request.extensions_mut().insert(AuthUser(user_context));

    Ok(next.run(request).await)
}

/// Requires an admin role on the already-authenticated caller. Must run
/// inside `auth_middleware`.
pub async fn admin_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let AuthUser(context) = request
        .extensions()
        .get::<AuthUser>()
        .cloned()
        .ok_or_else(|| AppError::Unauthorized("Authentication required".into()))?;

    let record = state.user_service.get_record(context.user_id).await?;
    if record.role != UserRole::Admin {
        return Err(AppError::Unauthorized("Administrator access required".into()));
    }

    Ok(next.run(request).await)
}
