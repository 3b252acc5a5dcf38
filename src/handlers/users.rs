use axum::{
    extract::{Multipart, Path, Query, State},
    Json,
};
use std::sync::Arc;

use crate::access::{self, Role};
use crate::auth::AuthUser;
use crate::models::*;
use crate::uploads;
use crate::AppState;

use super::{multipart_err, ok, ApiError, ApiResponse, FieldError, PagedResponse, PaginationQuery};

fn present_user(mut user: User, base_url: &str) -> User {
    if let Some(avatar) = &user.avatar {
        user.avatar_url = Some(uploads::public_url(base_url, avatar));
    }
    user
}

/// GET /api/v1/users
pub async fn list_users(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<PagedResponse<User>>, ApiError> {
    access::can_manage_users(auth.role()).require()?;

    let (page, limit, offset) = pagination.sanitize();
    let users = state.store.list_users(limit, offset).await?;
    let total = state.store.count_users().await?;
    let users = users
        .into_iter()
        .map(|u| present_user(u, &state.config.base_url))
        .collect();
    Ok(super::paged("users", users, page, limit, total))
}

/// GET /api/v1/users/:id
pub async fn get_user(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    access::can_manage_users(auth.role()).require()?;

    let user = state
        .store
        .get_user(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;
    Ok(ok("user", present_user(user, &state.config.base_url)))
}

/// PUT /api/v1/users/:id
pub async fn update_user(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    access::can_manage_users(auth.role()).require()?;

    if req.name.trim().is_empty() {
        return Err(ApiError::validation(
            "validation failed",
            vec![FieldError::new("name", "name is required")],
        ));
    }
    if Role::parse(&req.role).is_none() {
        return Err(ApiError::validation(
            "validation failed",
            vec![FieldError::new("role", "unknown role")],
        ));
    }

    let user = state.store.update_user(&id, &req).await?;
    Ok(ok("user updated", present_user(user, &state.config.base_url)))
}

/// DELETE /api/v1/users/:id
pub async fn delete_user(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    access::can_manage_users(auth.role()).require()?;

    if auth.user_id() == id {
        return Err(ApiError::bad_request("cannot delete your own account"));
    }

    state.store.delete_user(&id).await?;
    Ok(super::ok_message("user deleted"))
}

/// POST /api/v1/users/avatar — upload the caller's own avatar
pub async fn upload_avatar(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let mut file: Option<(String, axum::body::Bytes)> = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_err)? {
        if field.name() == Some("avatar") {
            let filename = field.file_name().unwrap_or("avatar").to_string();
            let data = field.bytes().await.map_err(multipart_err)?;
            file = Some((filename, data));
        }
    }

    let (filename, data) = file.ok_or_else(|| {
        ApiError::validation(
            "validation failed",
            vec![FieldError::new("avatar", "avatar file is required")],
        )
    })?;
    let ext = uploads::validate(&filename, data.len()).map_err(|msg| {
        ApiError::validation("validation failed", vec![FieldError::new("avatar", msg)])
    })?;

    let stored = uploads::store(&state.config.upload_dir, "avatars", &ext, &data).await?;
    state
        .store
        .set_user_avatar(auth.user_id(), stored.rel_path())
        .await?;
    stored.keep();

    let user = state
        .store
        .get_user(auth.user_id())
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;
    Ok(ok("avatar updated", present_user(user, &state.config.base_url)))
}
