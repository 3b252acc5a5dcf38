use axum::{
    extract::{Multipart, Path, Query, State},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::access::{self, Role};
use crate::auth::AuthUser;
use crate::models::*;
use crate::uploads;
use crate::AppState;

use super::{
    created, multipart_err, ok, paged, ApiError, ApiResponse, FieldError, PagedResponse,
    PaginationQuery,
};

fn present_provider(mut p: LaundryProvider, base_url: &str) -> LaundryProvider {
    if let Some(qris) = &p.qris_image {
        p.qris_url = Some(uploads::public_url(base_url, qris));
    }
    p
}

fn present_detail(mut d: LaundryOrderDetail, base_url: &str) -> LaundryOrderDetail {
    d.payment.proof_url = Some(uploads::public_url(base_url, &d.payment.proof));
    d
}

/// Provider joined with its price list for the detail view
#[derive(Serialize)]
pub struct ProviderDetail {
    #[serde(flatten)]
    pub provider: LaundryProvider,
    pub services: Vec<LaundryService>,
}

/// GET /api/v1/laundry/kost/:kost_id/providers
pub async fn list_providers(
    State(state): State<Arc<AppState>>,
    Path(kost_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<LaundryProvider>>>, ApiError> {
    let providers = state.store.laundry_providers_by_kost(&kost_id).await?;
    let providers = providers
        .into_iter()
        .map(|p| present_provider(p, &state.config.base_url))
        .collect();
    Ok(ok("laundry providers", providers))
}

/// GET /api/v1/laundry/providers/:id
pub async fn get_provider(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ProviderDetail>>, ApiError> {
    let provider = state
        .store
        .get_laundry_provider(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Laundry provider"))?;
    let services = state.store.laundry_services_by_provider(&id).await?;
    Ok(ok(
        "laundry provider",
        ProviderDetail {
            provider: present_provider(provider, &state.config.base_url),
            services,
        },
    ))
}

/// POST /api/v1/laundry/providers — multipart; `rekening_info` arrives as a
/// JSON-encoded string field and is parsed before validation
pub async fn create_provider(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<(axum::http::StatusCode, Json<ApiResponse<LaundryProvider>>), ApiError> {
    let mut kost_id = None;
    let mut name = None;
    let mut rekening_raw = None;
    let mut qris: Option<(String, axum::body::Bytes)> = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_err)? {
        match field.name().unwrap_or("") {
            "kost_id" => kost_id = Some(field.text().await.map_err(multipart_err)?),
            "name" => name = Some(field.text().await.map_err(multipart_err)?),
            "rekening_info" => rekening_raw = Some(field.text().await.map_err(multipart_err)?),
            "qris" => {
                let filename = field.file_name().unwrap_or("qris").to_string();
                let data = field.bytes().await.map_err(multipart_err)?;
                qris = Some((filename, data));
            }
            _ => {}
        }
    }

    let mut errors = Vec::new();
    let kost_id = kost_id.unwrap_or_default();
    if kost_id.is_empty() {
        errors.push(FieldError::new("kost_id", "kost_id is required"));
    }
    let name = name.unwrap_or_default();
    if name.trim().is_empty() {
        errors.push(FieldError::new("name", "name is required"));
    }
    let rekening_info: Option<RekeningInfo> = match rekening_raw.as_deref() {
        None => {
            errors.push(FieldError::new("rekening_info", "rekening_info is required"));
            None
        }
        Some(raw) => match serde_json::from_str(raw) {
            Ok(info) => Some(info),
            Err(_) => {
                errors.push(FieldError::new(
                    "rekening_info",
                    "rekening_info must be a JSON object with bank, account_number and account_holder",
                ));
                None
            }
        },
    };
    if !errors.is_empty() {
        return Err(ApiError::validation("validation failed", errors));
    }

    let kost = state
        .store
        .get_kost(&kost_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Kost"))?;
    access::can_manage_provider(auth.role(), auth.user_id(), &kost.owner_id).require()?;

    let stored_qris = match qris {
        Some((filename, data)) => {
            let ext = uploads::validate(&filename, data.len()).map_err(|msg| {
                ApiError::validation("validation failed", vec![FieldError::new("qris", msg)])
            })?;
            Some(uploads::store(&state.config.upload_dir, "qris", &ext, &data).await?)
        }
        None => None,
    };

    let provider = state
        .store
        .create_laundry_provider(
            &kost_id,
            &name,
            &rekening_info.expect("parsed above"),
            stored_qris.as_ref().map(|s| s.rel_path()),
        )
        .await?;
    if let Some(stored) = stored_qris {
        stored.keep();
    }

    Ok(created(
        "laundry provider created",
        present_provider(provider, &state.config.base_url),
    ))
}

/// PUT /api/v1/laundry/providers/:id
pub async fn update_provider(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateProviderRequest>,
) -> Result<Json<ApiResponse<LaundryProvider>>, ApiError> {
    let (_, owner_id) = state
        .store
        .laundry_provider_owner(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Laundry provider"))?;
    access::can_manage_provider(auth.role(), auth.user_id(), &owner_id).require()?;

    if req.name.trim().is_empty() {
        return Err(ApiError::bad_request("name is required"));
    }

    let provider = state.store.update_laundry_provider(&id, &req).await?;
    Ok(ok(
        "laundry provider updated",
        present_provider(provider, &state.config.base_url),
    ))
}

/// POST /api/v1/laundry/providers/:id/qris
pub async fn upload_provider_qris(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<LaundryProvider>>, ApiError> {
    let (_, owner_id) = state
        .store
        .laundry_provider_owner(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Laundry provider"))?;
    access::can_manage_provider(auth.role(), auth.user_id(), &owner_id).require()?;

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
    state
        .store
        .set_laundry_provider_qris(&id, stored.rel_path())
        .await?;
    stored.keep();

    let provider = state
        .store
        .get_laundry_provider(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Laundry provider"))?;
    Ok(ok(
        "qris image updated",
        present_provider(provider, &state.config.base_url),
    ))
}

/// GET /api/v1/laundry/providers/:id/services
pub async fn list_services(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<LaundryService>>>, ApiError> {
    Ok(ok(
        "laundry services",
        state.store.laundry_services_by_provider(&id).await?,
    ))
}

/// POST /api/v1/laundry/providers/:id/services
pub async fn create_service(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<CreateLaundryServiceRequest>,
) -> Result<(axum::http::StatusCode, Json<ApiResponse<LaundryService>>), ApiError> {
    let (_, owner_id) = state
        .store
        .laundry_provider_owner(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Laundry provider"))?;
    access::can_manage_provider(auth.role(), auth.user_id(), &owner_id).require()?;

    if req.name.trim().is_empty() {
        return Err(ApiError::bad_request("name is required"));
    }

    let service = state.store.create_laundry_service(&id, &req).await?;
    Ok(created("laundry service created", service))
}

/// PUT /api/v1/laundry/services/:id
pub async fn update_service(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<CreateLaundryServiceRequest>,
) -> Result<Json<ApiResponse<LaundryService>>, ApiError> {
    let service = state
        .store
        .get_laundry_service(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Laundry service"))?;
    let (_, owner_id) = state
        .store
        .laundry_provider_owner(&service.provider_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Laundry provider"))?;
    access::can_manage_provider(auth.role(), auth.user_id(), &owner_id).require()?;

    let service = state.store.update_laundry_service(&id, &req).await?;
    Ok(ok("laundry service updated", service))
}

/// DELETE /api/v1/laundry/services/:id
pub async fn delete_service(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let service = state
        .store
        .get_laundry_service(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Laundry service"))?;
    let (_, owner_id) = state
        .store
        .laundry_provider_owner(&service.provider_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Laundry provider"))?;
    access::can_manage_provider(auth.role(), auth.user_id(), &owner_id).require()?;

    state.store.delete_laundry_service(&id).await?;
    Ok(super::ok_message("laundry service deleted"))
}

/// POST /api/v1/laundry/orders — multipart: JSON-encoded `items` field plus
/// the payment proof file
pub async fn place_order(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<(axum::http::StatusCode, Json<ApiResponse<LaundryOrderDetail>>), ApiError> {
    access::can_place_order(auth.role()).require()?;

    let mut items_raw = None;
    let mut payment_method = None;
    let mut note = None;
    let mut proof: Option<(String, axum::body::Bytes)> = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_err)? {
        match field.name().unwrap_or("") {
            "items" => items_raw = Some(field.text().await.map_err(multipart_err)?),
            "payment_method" => payment_method = Some(field.text().await.map_err(multipart_err)?),
            "note" => note = Some(field.text().await.map_err(multipart_err)?),
            "payment_proof" => {
                let filename = field.file_name().unwrap_or("proof").to_string();
                let data = field.bytes().await.map_err(multipart_err)?;
                proof = Some((filename, data));
            }
            _ => {}
        }
    }

    let mut errors = Vec::new();
    let items: Vec<LaundryOrderItemInput> = match items_raw.as_deref() {
        None => {
            errors.push(FieldError::new("items", "items is required"));
            Vec::new()
        }
        Some(raw) => match serde_json::from_str(raw) {
            Ok(items) => items,
            Err(_) => {
                errors.push(FieldError::new(
                    "items",
                    "items must be a JSON array of {service_id, quantity}",
                ));
                Vec::new()
            }
        },
    };
    let payment_method = payment_method.unwrap_or_default();
    if payment_method.is_empty() {
        errors.push(FieldError::new("payment_method", "payment_method is required"));
    }
    let proof_ext = match &proof {
        None => {
            errors.push(FieldError::new("payment_proof", "payment proof file is required"));
            None
        }
        Some((filename, data)) => match uploads::validate(filename, data.len()) {
            Ok(ext) => Some(ext),
            Err(msg) => {
                errors.push(FieldError::new("payment_proof", msg));
                None
            }
        },
    };
    if !errors.is_empty() {
        return Err(ApiError::validation("validation failed", errors));
    }

    let (_, data) = proof.as_ref().expect("proof checked above");
    let stored = uploads::store(
        &state.config.upload_dir,
        "payment-proofs",
        &proof_ext.expect("ext checked above"),
        data,
    )
    .await?;

    let detail = state
        .store
        .place_laundry_order(
            auth.user_id(),
            &items,
            &payment_method,
            note.as_deref().filter(|n| !n.is_empty()),
            stored.rel_path(),
        )
        .await?;
    stored.keep();

    Ok(created(
        "order placed",
        present_detail(detail, &state.config.base_url),
    ))
}

/// GET /api/v1/laundry/orders — the caller's own orders
pub async fn my_orders(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<LaundryOrder>>>, ApiError> {
    let orders = state.store.laundry_orders_by_user(auth.user_id()).await?;
    Ok(ok("laundry orders", orders))
}

/// GET /api/v1/laundry/orders/:id
pub async fn order_detail(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<LaundryOrderDetail>>, ApiError> {
    let order = state
        .store
        .get_laundry_order(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Order"))?;
    let (_, owner_id) = state
        .store
        .laundry_provider_owner(&order.provider_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Laundry provider"))?;

    let actor = auth.user_id();
    if actor != order.user_id && actor != owner_id && auth.role() != Role::Admin {
        return Err(ApiError::forbidden("not authorized to view this order"));
    }

    let detail = state.store.laundry_order_detail(&id).await?;
    Ok(ok("order detail", present_detail(detail, &state.config.base_url)))
}

/// GET /api/v1/laundry/providers/:id/orders — manager view, paginated
pub async fn provider_orders(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<PagedResponse<LaundryOrder>>, ApiError> {
    let (_, owner_id) = state
        .store
        .laundry_provider_owner(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Laundry provider"))?;
    access::can_update_order_status(auth.role(), auth.user_id(), &owner_id).require()?;

    let (page, limit, offset) = pagination.sanitize();
    let orders = state
        .store
        .laundry_orders_by_provider(&id, limit, offset)
        .await?;
    let total = state.store.count_laundry_orders_by_provider(&id).await?;
    Ok(paged("provider orders", orders, page, limit, total))
}

/// PATCH /api/v1/laundry/orders/:id/status
pub async fn update_order_status(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateOrderStatusRequest>,
) -> Result<Json<ApiResponse<LaundryOrder>>, ApiError> {
    let order = state
        .store
        .get_laundry_order(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Order"))?;
    let (_, owner_id) = state
        .store
        .laundry_provider_owner(&order.provider_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Laundry provider"))?;
    access::can_update_order_status(auth.role(), auth.user_id(), &owner_id).require()?;

    let order = state.store.update_laundry_order_status(&id, &req.status).await?;
    Ok(ok("order status updated", order))
}

/// POST /api/v1/laundry/orders/:id/cancel
pub async fn cancel_order(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<LaundryOrder>>, ApiError> {
    let order = state
        .store
        .get_laundry_order(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Order"))?;
    access::can_cancel_order(auth.user_id(), &order.user_id).require()?;

    let order = state.store.cancel_laundry_order(&id).await?;
    Ok(ok("order cancelled", order))
}

/// PATCH /api/v1/laundry/orders/:id/payment — verify or reject the proof
pub async fn verify_payment(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<VerifyPaymentRequest>,
) -> Result<Json<ApiResponse<LaundryPayment>>, ApiError> {
    let order = state
        .store
        .get_laundry_order(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Order"))?;
    let (_, owner_id) = state
        .store
        .laundry_provider_owner(&order.provider_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Laundry provider"))?;
    access::can_verify_payment(auth.role(), auth.user_id(), &owner_id).require()?;

    let mut payment = state
        .store
        .verify_laundry_payment(&id, &req.status, auth.user_id())
        .await?;
    payment.proof_url = Some(uploads::public_url(&state.config.base_url, &payment.proof));
    Ok(ok("payment verification recorded", payment))
}
