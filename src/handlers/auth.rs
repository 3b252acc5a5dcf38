use axum::{extract::State, Json};
use std::sync::Arc;

use crate::access::Role;
use crate::auth::{issue_token, AuthUser};
use crate::models::*;
use crate::uploads;
use crate::AppState;

use super::{created, ok, ApiError, ApiResponse, FieldError};

fn present_user(mut user: User, base_url: &str) -> User {
    if let Some(avatar) = &user.avatar {
        user.avatar_url = Some(uploads::public_url(base_url, avatar));
    }
    user
}

/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(axum::http::StatusCode, Json<ApiResponse<User>>), ApiError> {
    let mut errors = Vec::new();
    if req.name.trim().is_empty() {
        errors.push(FieldError::new("name", "name is required"));
    }
    if req.email.trim().is_empty() || !req.email.contains('@') {
        errors.push(FieldError::new("email", "a valid email is required"));
    }
    if req.password.len() < 6 {
        errors.push(FieldError::new("password", "password must be at least 6 characters"));
    }
    match Role::parse(&req.role) {
        Some(Role::Penghuni) | Some(Role::Pengelola) => {}
        _ => errors.push(FieldError::new(
            "role",
            "role must be PENGHUNI or PENGELOLA",
        )),
    }
    if !errors.is_empty() {
        return Err(ApiError::validation("validation failed", errors));
    }

    if state.store.get_user_by_email(&req.email).await?.is_some() {
        return Err(ApiError::conflict("an account with this email already exists"));
    }

    let password_hash = bcrypt::hash(&req.password, bcrypt::DEFAULT_COST)
        .map_err(|e| ApiError::internal(format!("password hashing error: {}", e)))?;

    let user = state.store.create_user(&req, &password_hash).await?;
    Ok(created(
        "registration successful",
        present_user(user, &state.config.base_url),
    ))
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    if req.email.is_empty() || req.password.is_empty() {
        return Err(ApiError::bad_request("email and password are required"));
    }

    let user = state
        .store
        .get_user_by_email(&req.email)
        .await
        .map_err(|_| ApiError::internal("database error"))?
        .ok_or_else(|| ApiError::unauthorized("invalid credentials"))?;

    let valid = bcrypt::verify(&req.password, &user.password_hash)
        .map_err(|_| ApiError::internal("password verification error"))?;
    if !valid {
        return Err(ApiError::unauthorized("invalid credentials"));
    }

    let token = issue_token(&state.config.jwt_secret, &user.id, &user.email, &user.role)
        .map_err(|e| ApiError::internal(format!("token generation error: {}", e)))?;

    Ok(ok(
        "login successful",
        LoginResponse {
            token,
            user: present_user(user, &state.config.base_url),
        },
    ))
}

/// POST /api/v1/auth/refresh
pub async fn refresh(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    // Re-read the account so a deleted user or changed role invalidates
    // the refreshed token
    let user = state
        .store
        .get_user(auth.user_id())
        .await?
        .ok_or_else(|| ApiError::unauthorized("account no longer exists"))?;

    let token = issue_token(&state.config.jwt_secret, &user.id, &user.email, &user.role)
        .map_err(|e| ApiError::internal(format!("token generation error: {}", e)))?;

    Ok(ok(
        "token refreshed",
        LoginResponse {
            token,
            user: present_user(user, &state.config.base_url),
        },
    ))
}

/// GET /api/v1/auth/me
pub async fn me(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let user = state
        .store
        .get_user(auth.user_id())
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;
    Ok(ok("profile", present_user(user, &state.config.base_url)))
}
