use axum::{
    extract::{Multipart, Path, Query, State},
    Json,
};
use std::sync::Arc;

use crate::access;
use crate::auth::AuthUser;
use crate::models::*;
use crate::uploads;
use crate::AppState;

use super::{
    created, multipart_err, ok, paged, ApiError, ApiResponse, FieldError, PagedResponse,
};

fn present_kost(mut kost: Kost, base_url: &str) -> Kost {
    if let Some(qris) = &kost.qris_image {
        kost.qris_url = Some(uploads::public_url(base_url, qris));
    }
    kost
}

fn validate_kost(req: &CreateKostRequest) -> Result<(), ApiError> {
    let mut errors = Vec::new();
    if req.name.trim().is_empty() {
        errors.push(FieldError::new("name", "name is required"));
    }
    if req.total_rooms < 1 {
        errors.push(FieldError::new("total_rooms", "at least one room is required"));
    }
    if req.monthly_price < 0 {
        errors.push(FieldError::new("monthly_price", "price must not be negative"));
    }
    if req.discount < 0 || req.discount > req.monthly_price {
        errors.push(FieldError::new(
            "discount",
            "discount must be between 0 and the monthly price",
        ));
    }
    if req.deposit < 0 {
        errors.push(FieldError::new("deposit", "deposit must not be negative"));
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation("validation failed", errors))
    }
}

/// GET /api/v1/kost — public, paginated, filterable listing
pub async fn list_kosts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<KostListQuery>,
) -> Result<Json<PagedResponse<Kost>>, ApiError> {
    let (page, limit, offset) = query.sanitize();
    let kosts = state.store.list_kosts(&query, limit, offset).await?;
    let total = state.store.count_kosts(&query).await?;
    let kosts = kosts
        .into_iter()
        .map(|k| present_kost(k, &state.config.base_url))
        .collect();
    Ok(paged("kost listings", kosts, page, limit, total))
}

/// GET /api/v1/kost/:id — public detail with availability numbers
pub async fn get_kost(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<KostDetail>>, ApiError> {
    let kost = state
        .store
        .get_kost(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Kost"))?;

    let facilities = state.store.facilities_by_ids(&kost.facility_ids).await?;
    let rules = state.store.rules_by_ids(&kost.rule_ids).await?;
    let occupied = state.store.occupied_room_count(&kost.id).await?;
    let available = (kost.total_rooms - occupied).max(0);

    Ok(ok(
        "kost detail",
        KostDetail {
            kost: present_kost(kost, &state.config.base_url),
            facilities,
            rules,
            occupied_rooms: occupied,
            available_rooms: available,
        },
    ))
}

/// GET /api/v1/kost/mine — the calling pengelola's own listings
pub async fn my_kosts(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<Kost>>>, ApiError> {
    let kosts = state.store.list_kosts_by_owner(auth.user_id()).await?;
    let kosts = kosts
        .into_iter()
        .map(|k| present_kost(k, &state.config.base_url))
        .collect();
    Ok(ok("my kost listings", kosts))
}

/// POST /api/v1/kost
pub async fn create_kost(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateKostRequest>,
) -> Result<(axum::http::StatusCode, Json<ApiResponse<Kost>>), ApiError> {
    access::can_create_kost(auth.role()).require()?;
    validate_kost(&req)?;

    let kost = state.store.create_kost(auth.user_id(), &req).await?;
    Ok(created(
        "kost created, waiting for admin approval",
        present_kost(kost, &state.config.base_url),
    ))
}

/// PUT /api/v1/kost/:id
pub async fn update_kost(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<CreateKostRequest>,
) -> Result<Json<ApiResponse<Kost>>, ApiError> {
    let kost = state
        .store
        .get_kost(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Kost"))?;
    access::can_manage_kost(auth.role(), auth.user_id(), &kost.owner_id).require()?;
    validate_kost(&req)?;

    let kost = state.store.update_kost(&id, &req).await?;
    Ok(ok("kost updated", present_kost(kost, &state.config.base_url)))
}

/// PATCH /api/v1/kost/:id/approve — admin approval toggle
pub async fn approve_kost(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<ApproveKostRequest>,
) -> Result<Json<ApiResponse<Kost>>, ApiError> {
    access::can_approve_kost(auth.role()).require()?;

    let kost = state.store.set_kost_approved(&id, req.approve).await?;
    let message = if req.approve {
        "kost approved"
    } else {
        "kost approval revoked"
    };
    Ok(ok(message, present_kost(kost, &state.config.base_url)))
}

/// DELETE /api/v1/kost/:id
pub async fn delete_kost(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let kost = state
        .store
        .get_kost(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Kost"))?;
    access::can_manage_kost(auth.role(), auth.user_id(), &kost.owner_id).require()?;

    state.store.delete_kost(&id).await?;
    Ok(super::ok_message("kost deleted"))
}

/// POST /api/v1/kost/:id/qris — upload the listing's QRIS image
pub async fn upload_qris(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<Kost>>, ApiError> {
    let kost = state
        .store
        .get_kost(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Kost"))?;
    access::can_manage_kost(auth.role(), auth.user_id(), &kost.owner_id).require()?;

    let mut file: Option<(String, axum::body::Bytes)> = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_err)? {
        if field.name() == Some("qris") {
            let filename = field.file_name().unwrap_or("qris").to_string();
            let data = field.bytes().await.map_err(multipart_err)?;
            file = Some((filename, data));
        }
    }

    let (filename, data) = file.ok_or_else(|| {
        ApiError::validation(
            "validation failed",
            vec![FieldError::new("qris", "qris image is required")],
        )
    })?;
    let ext = uploads::validate(&filename, data.len()).map_err(|msg| {
        ApiError::validation("validation failed", vec![FieldError::new("qris", msg)])
    })?;

    let stored = uploads::store(&state.config.upload_dir, "qris", &ext, &data).await?;
    state.store.set_kost_qris(&id, stored.rel_path()).await?;
    stored.keep();

    let kost = state
        .store
        .get_kost(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Kost"))?;
    Ok(ok("qris image updated", present_kost(kost, &state.config.base_url)))
}
