use axum::{
    extract::{Multipart, Path, Query, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use std::sync::Arc;

use crate::access;
use crate::auth::AuthUser;
use crate::models::reservation_status as rstatus;
use crate::models::*;
use crate::uploads;
use crate::AppState;

use super::{
    created, multipart_err, ok, paged, ApiError, ApiResponse, FieldError, PagedResponse,
    PaginationQuery,
};

fn present(mut r: Reservation, base_url: &str) -> Reservation {
    r.proof_url = Some(uploads::public_url(base_url, &r.payment_proof));
    r
}

fn present_summary(mut s: ReservationSummary, base_url: &str) -> ReservationSummary {
    s.reservation = present(s.reservation, base_url);
    s
}

/// Fields of the multipart reservation-create form
#[derive(Default)]
struct CreateForm {
    kost_id: Option<String>,
    check_in_date: Option<String>,
    duration_months: Option<String>,
    payment_method: Option<String>,
    note: Option<String>,
    proof: Option<(String, axum::body::Bytes)>,
}

async fn read_create_form(multipart: &mut Multipart) -> Result<CreateForm, ApiError> {
    let mut form = CreateForm::default();
    while let Some(field) = multipart.next_field().await.map_err(multipart_err)? {
        match field.name().unwrap_or("") {
            "kost_id" => form.kost_id = Some(field.text().await.map_err(multipart_err)?),
            "check_in_date" => {
                form.check_in_date = Some(field.text().await.map_err(multipart_err)?)
            }
            "duration_months" => {
                form.duration_months = Some(field.text().await.map_err(multipart_err)?)
            }
            "payment_method" => {
                form.payment_method = Some(field.text().await.map_err(multipart_err)?)
            }
            "note" => form.note = Some(field.text().await.map_err(multipart_err)?),
            "payment_proof" => {
                let filename = field.file_name().unwrap_or("proof").to_string();
                let data = field.bytes().await.map_err(multipart_err)?;
                form.proof = Some((filename, data));
            }
            _ => {}
        }
    }
    Ok(form)
}

/// POST /api/v1/reservations — multipart form with the payment proof
pub async fn create_reservation(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<(axum::http::StatusCode, Json<ApiResponse<Reservation>>), ApiError> {
    access::can_create_reservation(auth.role()).require()?;

    let form = read_create_form(&mut multipart).await?;

    let mut errors = Vec::new();
    let kost_id = form.kost_id.unwrap_or_default();
    if kost_id.is_empty() {
        errors.push(FieldError::new("kost_id", "kost_id is required"));
    }
    let check_in_date = form
        .check_in_date
        .as_deref()
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok());
    match check_in_date {
        None => errors.push(FieldError::new(
            "check_in_date",
            "check_in_date must be a YYYY-MM-DD date",
        )),
        Some(date) if date < Utc::now().date_naive() => {
            errors.push(FieldError::new("check_in_date", "check-in date is in the past"))
        }
        Some(_) => {}
    }
    let duration_months = form
        .duration_months
        .as_deref()
        .and_then(|s| s.parse::<i64>().ok())
        .unwrap_or(0);
    if duration_months < 1 {
        errors.push(FieldError::new(
            "duration_months",
            "duration must be at least one month",
        ));
    }
    let payment_method = form.payment_method.unwrap_or_default();
    if payment_method.is_empty() {
        errors.push(FieldError::new("payment_method", "payment_method is required"));
    }
    let proof_ext = match &form.proof {
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

    let (_, data) = form.proof.as_ref().expect("proof checked above");
    let stored = uploads::store(
        &state.config.upload_dir,
        "payment-proofs",
        &proof_ext.expect("ext checked above"),
        data,
    )
    .await?;

    // The stored proof is deleted on any failure past this point
    let reservation = state
        .store
        .create_reservation(&NewReservation {
            user_id: auth.user_id().to_string(),
            kost_id,
            check_in_date: check_in_date.expect("date checked above"),
            duration_months,
            payment_method,
            payment_proof: stored.rel_path().to_string(),
            note: form.note.filter(|n| !n.is_empty()),
        })
        .await?;
    stored.keep();

    Ok(created(
        "reservation submitted",
        present(reservation, &state.config.base_url),
    ))
}

/// GET /api/v1/reservations/me — tenant dashboard, occupancy synced on read
pub async fn my_reservations(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<ReservationDashboard>>, ApiError> {
    let mut dashboard = state.store.reservation_dashboard(auth.user_id()).await?;
    let base = &state.config.base_url;
    dashboard.pending = dashboard
        .pending
        .into_iter()
        .map(|s| present_summary(s, base))
        .collect();
    dashboard.active = dashboard
        .active
        .into_iter()
        .map(|s| present_summary(s, base))
        .collect();
    dashboard.history = dashboard
        .history
        .into_iter()
        .map(|s| present_summary(s, base))
        .collect();
    Ok(ok("reservation dashboard", dashboard))
}

/// GET /api/v1/reservations/kost/:kost_id — manager view, paginated
pub async fn kost_reservations(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(kost_id): Path<String>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<PagedResponse<ReservationSummary>>, ApiError> {
    let kost = state
        .store
        .get_kost(&kost_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Kost"))?;
    access::can_view_kost_reservations(auth.role(), auth.user_id(), &kost.owner_id).require()?;

    let (page, limit, offset) = pagination.sanitize();
    let reservations = state.store.reservations_by_kost(&kost_id, limit, offset).await?;
    let total = state.store.count_reservations_by_kost(&kost_id).await?;
    let reservations = reservations
        .into_iter()
        .map(|s| present_summary(s, &state.config.base_url))
        .collect();
    Ok(paged("kost reservations", reservations, page, limit, total))
}

/// PATCH /api/v1/reservations/:id/status — approve or reject (terminal)
pub async fn update_status(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateReservationStatusRequest>,
) -> Result<Json<ApiResponse<Reservation>>, ApiError> {
    let reservation = state
        .store
        .get_reservation(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Reservation"))?;
    let kost = state
        .store
        .get_kost(&reservation.kost_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Kost"))?;
    access::can_decide_reservation(auth.role(), auth.user_id(), &kost.owner_id).require()?;

    let updated = state
        .store
        .update_reservation_status(&id, &req.status, auth.user_id(), req.rejection_reason)
        .await?;
    let message = if updated.status == rstatus::APPROVED {
        "reservation approved"
    } else {
        "reservation rejected"
    };
    Ok(ok(message, present(updated, &state.config.base_url)))
}

/// Fields of the multipart extension form
#[derive(Default)]
struct ExtendForm {
    additional_months: Option<String>,
    payment_method: Option<String>,
    note: Option<String>,
    proof: Option<(String, axum::body::Bytes)>,
}

/// POST /api/v1/reservations/:id/extend — multipart form with the payment proof
pub async fn extend_reservation(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<Reservation>>, ApiError> {
    let reservation = state
        .store
        .get_reservation(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Reservation"))?;
    access::can_extend_reservation(auth.user_id(), &reservation.user_id).require()?;

    let mut form = ExtendForm::default();
    while let Some(field) = multipart.next_field().await.map_err(multipart_err)? {
        match field.name().unwrap_or("") {
            "additional_months" => {
                form.additional_months = Some(field.text().await.map_err(multipart_err)?)
            }
            "payment_method" => {
                form.payment_method = Some(field.text().await.map_err(multipart_err)?)
            }
            "note" => form.note = Some(field.text().await.map_err(multipart_err)?),
            "payment_proof" => {
                let filename = field.file_name().unwrap_or("proof").to_string();
                let data = field.bytes().await.map_err(multipart_err)?;
                form.proof = Some((filename, data));
            }
            _ => {}
        }
    }

    let mut errors = Vec::new();
    let additional_months = form
        .additional_months
        .as_deref()
        .and_then(|s| s.parse::<i64>().ok())
        .unwrap_or(0);
    if additional_months < 1 {
        errors.push(FieldError::new(
            "additional_months",
            "extension must be at least one month",
        ));
    }
    let payment_method = form.payment_method.unwrap_or_default();
    if payment_method.is_empty() {
        errors.push(FieldError::new("payment_method", "payment_method is required"));
    }
    let proof_ext = match &form.proof {
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

    let (_, data) = form.proof.as_ref().expect("proof checked above");
    let stored = uploads::store(
        &state.config.upload_dir,
        "payment-proofs",
        &proof_ext.expect("ext checked above"),
        data,
    )
    .await?;

    let updated = state
        .store
        .extend_reservation(
            &id,
            &NewExtension {
                additional_months,
                payment_method,
                payment_proof: stored.rel_path().to_string(),
                note: form.note.filter(|n| !n.is_empty()),
            },
        )
        .await?;
    stored.keep();

    Ok(ok(
        "reservation extended",
        present(updated, &state.config.base_url),
    ))
}
