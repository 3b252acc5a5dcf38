use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::auth::AuthUser;
use crate::models::*;
use crate::uploads;
use crate::AppState;

use super::{ok, ApiError, ApiResponse};

/// GET /api/v1/history/reservations — every reservation the caller has ever
/// made, occupancy synced on read
pub async fn reservation_history(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<ReservationSummary>>>, ApiError> {
    let reservations = state.store.reservations_by_user(auth.user_id()).await?;
    let reservations = reservations
        .into_iter()
        .map(|mut s| {
            s.reservation.proof_url = Some(uploads::public_url(
                &state.config.base_url,
                &s.reservation.payment_proof,
            ));
            s
        })
        .collect();
    Ok(ok("reservation history", reservations))
}

/// Combined marketplace order history
#[derive(Serialize)]
pub struct OrderHistory {
    pub catering: Vec<CateringOrder>,
    pub laundry: Vec<LaundryOrder>,
}

/// GET /api/v1/history/orders
pub async fn order_history(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<OrderHistory>>, ApiError> {
    let catering = state.store.catering_orders_by_user(auth.user_id()).await?;
    let laundry = state.store.laundry_orders_by_user(auth.user_id()).await?;
    Ok(ok("order history", OrderHistory { catering, laundry }))
}
