use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::access;
use crate::auth::AuthUser;
use crate::models::*;
use crate::AppState;

use super::{created, ok, ok_message, ApiError, ApiResponse};

// Facility types, house rules and the laundry service-unit catalog are
// read-mostly reference data: public lists, admin-only mutations.

pub async fn list_facilities(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<Facility>>>, ApiError> {
    Ok(ok("facilities", state.store.list_facilities().await?))
}

pub async fn create_facility(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateFacilityRequest>,
) -> Result<(axum::http::StatusCode, Json<ApiResponse<Facility>>), ApiError> {
    access::can_manage_master(auth.role()).require()?;
    if req.name.trim().is_empty() {
        return Err(ApiError::bad_request("name is required"));
    }
    Ok(created(
        "facility created",
        state.store.create_facility(&req).await?,
    ))
}

pub async fn update_facility(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<CreateFacilityRequest>,
) -> Result<Json<ApiResponse<Facility>>, ApiError> {
    access::can_manage_master(auth.role()).require()?;
    Ok(ok(
        "facility updated",
        state.store.update_facility(&id, &req).await?,
    ))
}

pub async fn delete_facility(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    access::can_manage_master(auth.role()).require()?;
    state.store.delete_facility(&id).await?;
    Ok(ok_message("facility deleted"))
}

pub async fn list_rules(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<Rule>>>, ApiError> {
    Ok(ok("rules", state.store.list_rules().await?))
}

pub async fn create_rule(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateRuleRequest>,
) -> Result<(axum::http::StatusCode, Json<ApiResponse<Rule>>), ApiError> {
    access::can_manage_master(auth.role()).require()?;
    if req.name.trim().is_empty() {
        return Err(ApiError::bad_request("name is required"));
    }
    Ok(created("rule created", state.store.create_rule(&req).await?))
}

pub async fn update_rule(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<CreateRuleRequest>,
) -> Result<Json<ApiResponse<Rule>>, ApiError> {
    access::can_manage_master(auth.role()).require()?;
    Ok(ok("rule updated", state.store.update_rule(&id, &req).await?))
}

pub async fn delete_rule(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    access::can_manage_master(auth.role()).require()?;
    state.store.delete_rule(&id).await?;
    Ok(ok_message("rule deleted"))
}

pub async fn list_laundry_units(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<LaundryUnit>>>, ApiError> {
    Ok(ok("laundry units", state.store.list_laundry_units().await?))
}

pub async fn create_laundry_unit(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateLaundryUnitRequest>,
) -> Result<(axum::http::StatusCode, Json<ApiResponse<LaundryUnit>>), ApiError> {
    access::can_manage_master(auth.role()).require()?;
    if req.name.trim().is_empty() {
        return Err(ApiError::bad_request("name is required"));
    }
    Ok(created(
        "laundry unit created",
        state.store.create_laundry_unit(&req).await?,
    ))
}

pub async fn update_laundry_unit(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<CreateLaundryUnitRequest>,
) -> Result<Json<ApiResponse<LaundryUnit>>, ApiError> {
    access::can_manage_master(auth.role()).require()?;
    Ok(ok(
        "laundry unit updated",
        state.store.update_laundry_unit(&id, &req).await?,
    ))
}

pub async fn delete_laundry_unit(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    access::can_manage_master(auth.role()).require()?;
    state.store.delete_laundry_unit(&id).await?;
    Ok(ok_message("laundry unit deleted"))
}
