//! HTTP Request Handlers
//!
//! Axum handlers translating HTTP requests into service calls.

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::Utc;

use crate::api::middleware::AuthUser;
use crate::api::AppState;
use crate::models::requests::*;
use crate::models::{ListedUser, User, UserSearchResult};
use crate::utils::error::AppResult;
use crate::VERSION;

/// Health check endpoint
pub async fn health_check() -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        version: VERSION.to_string(),
    })
}

/// Create a new account
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> AppResult<Json<RegisterResponse>> {
    let response = state.auth_service.register(request).await?;
    Ok(Json(response))
}

/// Authenticate credentials and issue a session token
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let response = state.auth_service.login(request).await?;
    Ok(Json(response))
}

/// Request a password-reset email
pub async fn request_password_reset(
    State(state): State<AppState>,
    Json(request): Json<RequestPasswordResetRequest>,
) -> AppResult<Json<MessageResponse>> {
    let response = state
        .auth_service
        .request_password_reset(&request.email)
        .await?;
    Ok(Json(response))
}

/// Check a reset token without consuming it
pub async fn verify_reset_token(
    State(state): State<AppState>,
    Query(query): Query<ResetTokenQuery>,
) -> AppResult<Json<MessageResponse>> {
    let response = state.auth_service.verify_reset_token(&query.token).await?;
    Ok(Json(response))
}

/// Redeem a reset token for a new password
pub async fn reset_password(
    State(state): State<AppState>,
    Json(request): Json<ResetPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    let response = state
        .auth_service
        .reset_password(&request.token, &request.password)
        .await?;
    Ok(Json(response))
}

/// Enroll the caller in two-factor authentication
pub async fn enable_two_factor(
    State(state): State<AppState>,
    Extension(AuthUser(context)): Extension<AuthUser>,
) -> AppResult<Json<TwoFactorSetupResponse>> {
    let response = state.auth_service.enable_two_factor(context.user_id).await?;
    Ok(Json(response))
}

/// Verify a two-factor code for the caller
pub async fn verify_two_factor(
    State(state): State<AppState>,
    Extension(AuthUser(context)): Extension<AuthUser>,
    Json(request): Json<TwoFactorVerifyRequest>,
) -> AppResult<Json<MessageResponse>> {
    let response = state
        .auth_service
        .verify_two_factor(context.user_id, &request.code)
        .await?;
    Ok(Json(response))
}

/// Turn two-factor authentication off for the caller
pub async fn disable_two_factor(
    State(state): State<AppState>,
    Extension(AuthUser(context)): Extension<AuthUser>,
) -> AppResult<Json<MessageResponse>> {
    let response = state
        .auth_service
        .disable_two_factor(context.user_id)
        .await?;
    Ok(Json(response))
}

/// List users, paginated (admin only)
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<PaginationQuery>,
) -> AppResult<Json<Vec<ListedUser>>> {
    let users = state
        .user_service
        .list_users(query.page(), query.limit())
        .await?;
    Ok(Json(users))
}

/// The caller's own profile
pub async fn me(
    State(state): State<AppState>,
    Extension(AuthUser(context)): Extension<AuthUser>,
) -> AppResult<Json<User>> {
    let profile = state.user_service.get_profile(context.user_id).await?;
    Ok(Json(profile))
}

/// Search users by name, paginated
pub async fn search_users(
    State(state): State<AppState>,
    Query(query): Query<SearchUsersQuery>,
) -> AppResult<Json<Vec<UserSearchResult>>> {
    let pagination = query.pagination();
    let users = state
        .user_service
        .search_users(&query.name, pagination.page(), pagination.limit())
        .await?;
    Ok(Json(users))
}
